//! WASM bindings for Stiffness Solver
//!
//! Runs the solvers directly in the browser. Each entry point takes the same
//! JSON request as the HTTP server and returns the same envelope.

use wasm_bindgen::prelude::*;

use crate::analysis::AnalysisOptions;
use crate::api::{self, ApiResponse, BeamRequest, ColumnRequest, FrameRequest};
use crate::error::FEAError;

// Use wee_alloc for smaller WASM binary
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn parse<T: for<'de> serde::Deserialize<'de>>(request_json: &str) -> Result<T, JsValue> {
    serde_json::from_str(request_json)
        .map_err(|e| JsValue::from_str(&FEAError::from(e).to_string()))
}

fn finish<T: serde::Serialize>(label: &str, started: f64, response: ApiResponse<T>) -> String {
    let elapsed = js_sys::Date::now() - started;
    match &response {
        ApiResponse::Success { .. } => web_sys::console::debug_1(&JsValue::from_str(&format!(
            "{} solved in {:.2} ms",
            label, elapsed
        ))),
        ApiResponse::Error { message } => {
            web_sys::console::error_1(&JsValue::from_str(&format!("{} failed: {}", label, message)))
        }
    }
    api::to_json(&response)
}

/// Solve a beam; malformed JSON is thrown, solver errors come back in the envelope
#[wasm_bindgen]
pub fn analyze_beam(request_json: &str) -> Result<String, JsValue> {
    let request: BeamRequest = parse(request_json)?;
    let started = js_sys::Date::now();
    let response = ApiResponse::from_result(api::run_beam(&request, &AnalysisOptions::default()));
    Ok(finish("beam", started, response))
}

/// Solve a frame
#[wasm_bindgen]
pub fn analyze_frame(request_json: &str) -> Result<String, JsValue> {
    let request: FrameRequest = parse(request_json)?;
    let started = js_sys::Date::now();
    let response = ApiResponse::from_result(api::run_frame(&request, &AnalysisOptions::default()));
    Ok(finish("frame", started, response))
}

/// Column buckling
#[wasm_bindgen]
pub fn analyze_column(request_json: &str) -> Result<String, JsValue> {
    let request: ColumnRequest = parse(request_json)?;
    let started = js_sys::Date::now();
    let response = ApiResponse::from_result(api::run_column(&request));
    Ok(finish("column", started, response))
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
