//! Request layer shared by the HTTP server and the WASM bindings
//!
//! Requests are plain serde records with the field names and defaults of the
//! public JSON interface. Each converts into a validated model with
//! `into_model`, and every response is wrapped in an [`ApiResponse`]
//! envelope.

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisOptions;
use crate::beam::BeamModel;
use crate::column::{BucklingResults, ColumnModel, EndCondition};
use crate::elements::{FrameElement, FrameNode, NodeId, SupportKind};
use crate::error::{FEAError, FEAResult};
use crate::frame::FrameModel;
use crate::loads::{DistributedLoad, NodeLoad, PointLoad};
use crate::results::{BeamResults, FrameResults};

fn default_length() -> f64 {
    10.0
}

fn default_modulus() -> f64 {
    200e9
}

fn default_inertia() -> f64 {
    1e-4
}

/// Beam support as received on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamSupportData {
    pub pos: f64,
    /// "fixed", "roller"; anything else is a pin
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Beam analysis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamRequest {
    #[serde(default = "default_length")]
    pub length: f64,
    #[serde(rename = "E", default = "default_modulus")]
    pub e: f64,
    #[serde(rename = "I", default = "default_inertia")]
    pub i: f64,
    #[serde(default)]
    pub supports: Vec<BeamSupportData>,
    #[serde(default)]
    pub loads: Vec<PointLoad>,
    #[serde(default)]
    pub dist_loads: Vec<DistributedLoad>,
}

impl Default for BeamRequest {
    fn default() -> Self {
        Self {
            length: default_length(),
            e: default_modulus(),
            i: default_inertia(),
            supports: Vec::new(),
            loads: Vec::new(),
            dist_loads: Vec::new(),
        }
    }
}

impl BeamRequest {
    /// Build the beam model this request describes
    pub fn into_model(&self) -> FEAResult<BeamModel> {
        let mut builder = BeamModel::builder(self.length, self.e, self.i);
        for support in &self.supports {
            builder = builder.support(support.pos, SupportKind::from_beam_label(&support.kind));
        }
        for load in &self.loads {
            builder = builder.point_load(*load);
        }
        for load in &self.dist_loads {
            builder = builder.distributed_load(*load);
        }
        builder.build()
    }
}

/// Frame node as received on the wire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameNodeData {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
}

/// Frame support as received on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSupportData {
    pub node: NodeId,
    /// "pin", "pinned", "roller" or "fixed"
    #[serde(rename = "type")]
    pub kind: String,
}

/// Frame analysis request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameRequest {
    #[serde(default)]
    pub nodes: Vec<FrameNodeData>,
    #[serde(default)]
    pub elements: Vec<FrameElement>,
    #[serde(default)]
    pub supports: Vec<FrameSupportData>,
    #[serde(default)]
    pub loads: Vec<NodeLoad>,
}

impl FrameRequest {
    /// Build the frame model this request describes
    pub fn into_model(&self) -> FEAResult<FrameModel> {
        let mut builder = FrameModel::builder();
        for node in &self.nodes {
            builder = builder.node(node.id, FrameNode::new(node.x, node.y));
        }
        for element in &self.elements {
            builder = builder.element(element.clone());
        }
        for support in &self.supports {
            builder = builder.support(support.node, support.kind.parse()?);
        }
        for load in &self.loads {
            builder = builder.load(*load);
        }
        builder.build()
    }
}

/// Column buckling request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRequest {
    pub length: f64,
    #[serde(rename = "E")]
    pub e: f64,
    #[serde(rename = "I")]
    pub i: f64,
    #[serde(rename = "A")]
    pub a: f64,
    /// "pin-pin" when absent
    #[serde(default)]
    pub k_type: Option<String>,
}

impl ColumnRequest {
    /// Build the column this request describes
    pub fn into_model(&self) -> FEAResult<ColumnModel> {
        let end_condition = match &self.k_type {
            Some(label) => label.parse()?,
            None => EndCondition::default(),
        };
        Ok(ColumnModel::new(self.length, self.e, self.i, self.a, end_condition))
    }
}

/// Response envelope: `{"status": "success", "data": ...}` or
/// `{"status": "error", "message": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ApiResponse<T> {
    Success { data: T },
    Error { message: String },
}

impl<T> ApiResponse<T> {
    /// Wrap a solver result
    pub fn from_result(result: FEAResult<T>) -> Self {
        match result {
            Ok(data) => Self::Success { data },
            Err(e) => Self::Error {
                message: e.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Fewest beam diagram samples the service returns
pub const MIN_SERVICE_SAMPLES: usize = 500;

/// Beam routes: versioned path and the path of the bundled front end
pub const BEAM_ROUTES: [&str; 2] = ["/api/v1/beam", "/calculate"];
/// Frame routes
pub const FRAME_ROUTES: [&str; 2] = ["/api/v1/frame", "/calculate_frame"];
/// Column routes
pub const COLUMN_ROUTES: [&str; 2] = ["/api/v1/column", "/calculate_pillar"];

/// Analysis options for the service with `samples` diagram points
///
/// Settings below [`MIN_SERVICE_SAMPLES`] are raised to it with a warning.
pub fn service_options(samples: usize) -> AnalysisOptions {
    if samples < MIN_SERVICE_SAMPLES {
        log::warn!(
            "{} diagram samples requested, using the minimum of {}",
            samples,
            MIN_SERVICE_SAMPLES
        );
    }
    AnalysisOptions::default().with_samples(samples.max(MIN_SERVICE_SAMPLES))
}

/// HTTP status code for a failed request
pub fn status_code(err: &FEAError) -> u16 {
    if err.is_unstable() {
        422
    } else if err.is_input_error() {
        400
    } else {
        500
    }
}

/// Solve a beam request
pub fn run_beam(request: &BeamRequest, options: &AnalysisOptions) -> FEAResult<BeamResults> {
    request.into_model()?.analyze(options)
}

/// Solve a frame request
pub fn run_frame(request: &FrameRequest, options: &AnalysisOptions) -> FEAResult<FrameResults> {
    request.into_model()?.analyze(options)
}

/// Solve a column request
pub fn run_column(request: &ColumnRequest) -> FEAResult<BucklingResults> {
    request.into_model()?.analyze()
}

/// Serialize an envelope, falling back to an error envelope if encoding fails
pub fn to_json<T: Serialize>(response: &ApiResponse<T>) -> String {
    match serde_json::to_string(response) {
        Ok(json) => json,
        Err(e) => serde_json::json!({
            "status": "error",
            "message": FEAError::from(e).to_string(),
        })
        .to_string(),
    }
}

fn handle_json<Req, Res>(request_json: &str, run: impl FnOnce(&Req) -> FEAResult<Res>) -> String
where
    Req: for<'de> Deserialize<'de>,
    Res: Serialize,
{
    let result = serde_json::from_str::<Req>(request_json)
        .map_err(FEAError::from)
        .and_then(|request| run(&request));
    if let Err(e) = &result {
        log::error!("Request failed: {}", e);
    }
    to_json(&ApiResponse::from_result(result))
}

/// Beam request JSON in, envelope JSON out
pub fn beam_json(request_json: &str, options: &AnalysisOptions) -> String {
    handle_json(request_json, |req: &BeamRequest| run_beam(req, options))
}

/// Frame request JSON in, envelope JSON out
pub fn frame_json(request_json: &str, options: &AnalysisOptions) -> String {
    handle_json(request_json, |req: &FrameRequest| run_frame(req, options))
}

/// Column request JSON in, envelope JSON out
pub fn column_json(request_json: &str) -> String {
    handle_json(request_json, run_column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beam_request_defaults() {
        let request: BeamRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, BeamRequest::default());
        assert_eq!(request.length, 10.0);
        assert_eq!(request.e, 200e9);
        assert_eq!(request.i, 1e-4);
    }

    #[test]
    fn test_unknown_beam_support_label_is_a_pin() {
        let request: BeamRequest = serde_json::from_str(
            r#"{"supports": [{"pos": 0, "type": "hinge"}, {"pos": 10, "type": "roller"}],
                "loads": [{"pos": 5, "magnitude": -1000}]}"#,
        )
        .unwrap();
        let model = request.into_model().unwrap();
        assert_eq!(model.supports()[0].kind, SupportKind::Pinned);
        assert_eq!(model.supports()[1].kind, SupportKind::Roller);
    }

    #[test]
    fn test_unknown_frame_support_type_is_rejected() {
        let request: FrameRequest = serde_json::from_str(
            r#"{"nodes": [{"id": 1, "x": 0, "y": 0}], "supports": [{"node": 1, "type": "hinge"}]}"#,
        )
        .unwrap();
        let err = request.into_model().unwrap_err();
        assert!(matches!(err, FEAError::InvalidInput(_)));
        assert_eq!(status_code(&err), 400);
    }

    #[test]
    fn test_column_k_type_default_and_error() {
        let request: ColumnRequest =
            serde_json::from_str(r#"{"length": 3, "E": 200e9, "I": 1e-6, "A": 1e-3}"#).unwrap();
        assert_eq!(run_column(&request).unwrap().k, 1.0);

        let request = ColumnRequest {
            k_type: Some("free-free".to_string()),
            ..request
        };
        assert!(run_column(&request).is_err());
    }

    #[test]
    fn test_envelope_shape() {
        let ok: ApiResponse<u32> = ApiResponse::from_result(Ok(3));
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"], 3);

        let err: ApiResponse<u32> =
            ApiResponse::from_result(Err(FEAError::Unstable("singular".to_string())));
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["status"], "error");
        assert!(json["message"].as_str().unwrap().contains("unstable"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(status_code(&FEAError::Unstable(String::new())), 422);
        assert_eq!(status_code(&FEAError::NodeNotFound(3)), 400);
        assert_eq!(status_code(&FEAError::AnalysisFailed(String::new())), 500);
    }

    #[test]
    fn test_service_options_keep_the_sample_floor() {
        assert_eq!(service_options(10).num_samples, MIN_SERVICE_SAMPLES);
        assert_eq!(service_options(0).num_samples, MIN_SERVICE_SAMPLES);
        assert_eq!(service_options(2000).num_samples, 2000);
    }

    #[test]
    fn test_routes_include_front_end_paths() {
        assert!(BEAM_ROUTES.contains(&"/calculate"));
        assert!(FRAME_ROUTES.contains(&"/calculate_frame"));
        assert!(COLUMN_ROUTES.contains(&"/calculate_pillar"));

        let mut all: Vec<&str> =
            BEAM_ROUTES.iter().chain(&FRAME_ROUTES).chain(&COLUMN_ROUTES).copied().collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 6);
    }

    #[test]
    fn test_malformed_json_is_an_error_envelope() {
        let out = column_json("{not json");
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["status"], "error");
    }
}
