//! Stiffness Solver HTTP Server

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{de::DeserializeOwned, Serialize};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};

use stiffness_solver::api::{self, ApiResponse, BeamRequest, ColumnRequest, FrameRequest};
use stiffness_solver::prelude::*;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Debug, Clone)]
struct AppState {
    options: AnalysisOptions,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn respond<T: Serialize>(label: &str, result: FEAResult<T>) -> (StatusCode, Json<ApiResponse<T>>) {
    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            log::error!("Error in {} calculation: {}", label, e);
            StatusCode::from_u16(api::status_code(e)).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        }
    };
    (status, Json(ApiResponse::from_result(result)))
}

/// Malformed JSON is reported through the same envelope as solver errors
fn parse<T: DeserializeOwned>(body: &str) -> FEAResult<T> {
    Ok(serde_json::from_str(body)?)
}

async fn beam(State(state): State<AppState>, body: String) -> impl IntoResponse {
    let result = parse::<BeamRequest>(&body).and_then(|request| {
        log::info!(
            "Received beam request: L={}, {} supports, {} point loads, {} distributed loads",
            request.length,
            request.supports.len(),
            request.loads.len(),
            request.dist_loads.len()
        );
        api::run_beam(&request, &state.options)
    });
    respond("beam", result)
}

async fn frame(State(state): State<AppState>, body: String) -> impl IntoResponse {
    let result = parse::<FrameRequest>(&body).and_then(|request| {
        log::info!(
            "Received frame request: {} nodes, {} elements",
            request.nodes.len(),
            request.elements.len()
        );
        api::run_frame(&request, &state.options)
    });
    respond("frame", result)
}

async fn column(body: String) -> impl IntoResponse {
    let result = parse::<ColumnRequest>(&body).and_then(|request| {
        log::info!("Received column request: {:?}", request);
        api::run_column(&request)
    });
    respond("column", result)
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let host: std::net::IpAddr = env_or("HOST", std::net::IpAddr::from([0, 0, 0, 0]));
    let port: u16 = env_or("PORT", 8086);
    let samples: usize = env_or("FEA_BEAM_SAMPLES", 500);

    let state = AppState {
        options: api::service_options(samples),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new().route("/health", get(health));
    for path in api::BEAM_ROUTES {
        app = app.route(path, post(beam));
    }
    for path in api::FRAME_ROUTES {
        app = app.route(path, post(frame));
    }
    for path in api::COLUMN_ROUTES {
        app = app.route(path, post(column));
    }
    let app = app.layer(cors).with_state(state);

    let addr = SocketAddr::new(host, port);
    println!("Stiffness Solver Server listening on http://{}", addr);
    println!("  Health check: GET  /health");
    println!("  Beam:         POST {}", api::BEAM_ROUTES.join(", "));
    println!("  Frame:        POST {}", api::FRAME_ROUTES.join(", "));
    println!("  Column:       POST {}", api::COLUMN_ROUTES.join(", "));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
