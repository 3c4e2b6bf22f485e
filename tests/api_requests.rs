//! JSON request layer: defaults, type mapping and the response envelope

use approx::assert_relative_eq;
use serde_json::{json, Value};
use stiffness_solver::api::{self, BeamRequest};
use stiffness_solver::prelude::*;

fn parse(out: &str) -> Value {
    serde_json::from_str(out).unwrap()
}

#[test]
fn beam_request_round_trip() {
    let request = json!({
        "supports": [{"pos": 0, "type": "pin"}, {"pos": 10, "type": "roller"}],
        "loads": [{"pos": 5, "magnitude": -1000}],
    });
    let out = parse(&api::beam_json(&request.to_string(), &AnalysisOptions::default()));

    assert_eq!(out["status"], "success");
    let data = &out["data"];
    assert_eq!(data["x"].as_array().unwrap().len(), 500);
    assert_eq!(data["reactions"][0]["type"], "pin");
    assert_eq!(data["reactions"][1]["type"], "roller");
    assert_relative_eq!(data["reactions"][0]["Fy"].as_f64().unwrap(), 500.0, epsilon = 1e-6);
    assert!(data["summary"]["max_moment"].as_f64().unwrap() > 2400.0);
}

#[test]
fn beam_request_with_distributed_load() {
    let request: BeamRequest = serde_json::from_value(json!({
        "length": 8,
        "E": 210e9,
        "I": 2e-5,
        "supports": [{"pos": 0, "type": "fixed"}],
        "dist_loads": [{"start": 0, "end": 8, "magnitude": -500}],
    }))
    .unwrap();

    let results = api::run_beam(&request, &AnalysisOptions::default()).unwrap();
    let root = &results.reactions[0];
    assert_eq!(root.kind, SupportKind::Fixed);
    assert_relative_eq!(root.fy, 4000.0, epsilon = 1e-6);
    assert_relative_eq!(root.mz, 500.0 * 64.0 / 2.0, epsilon = 1e-6);

    // δ_tip = wL⁴/8EI
    let tip = results.deflection.last().copied().unwrap();
    assert_relative_eq!(tip, -500.0 * 8.0_f64.powi(4) / (8.0 * 210e9 * 2e-5), max_relative = 1e-9);
}

#[test]
fn beam_errors_come_back_in_the_envelope() {
    let request = json!({"loads": [{"pos": 5, "magnitude": -1000}]});
    let out = parse(&api::beam_json(&request.to_string(), &AnalysisOptions::default()));
    assert_eq!(out["status"], "error");
    assert!(out["message"].as_str().unwrap().contains("unstable"));

    let request = json!({"length": 4, "loads": [{"pos": 5, "magnitude": -1}]});
    let out = parse(&api::beam_json(&request.to_string(), &AnalysisOptions::default()));
    assert_eq!(out["status"], "error");
}

#[test]
fn frame_request_round_trip() {
    let request = json!({
        "nodes": [{"id": 1, "x": 0, "y": 0}, {"id": 2, "x": 4, "y": 0}],
        "elements": [{"id": 1, "n1": 1, "n2": 2, "E": 200e9, "A": 0.01, "I": 1e-4}],
        "supports": [{"node": 1, "type": "pinned"}, {"node": 2, "type": "roller"}],
        "loads": [{"node": 2, "fy": -1000}],
    });
    let out = parse(&api::frame_json(&request.to_string(), &AnalysisOptions::default()));

    assert_eq!(out["status"], "success");
    let data = &out["data"];
    assert_eq!(data["nodes"].as_array().unwrap().len(), 2);
    assert_eq!(data["elements"][0]["id"], 1);
    assert_eq!(data["reactions"][1]["node"], 2);
    assert_relative_eq!(data["reactions"][1]["Ry"].as_f64().unwrap(), 1000.0, epsilon = 1e-6);
    assert!(data.get("statics_residual").is_none());
}

#[test]
fn frame_unknown_support_type_is_an_error() {
    let request = json!({
        "nodes": [{"id": 1, "x": 0, "y": 0}, {"id": 2, "x": 4, "y": 0}],
        "elements": [{"id": 1, "n1": 1, "n2": 2, "E": 200e9, "A": 0.01, "I": 1e-4}],
        "supports": [{"node": 1, "type": "clamped"}],
    });
    let out = parse(&api::frame_json(&request.to_string(), &AnalysisOptions::default()));
    assert_eq!(out["status"], "error");
    assert!(out["message"].as_str().unwrap().contains("clamped"));
}

#[test]
fn column_request_round_trip() {
    let request = json!({"length": 3, "E": 200e9, "I": 8e-6, "A": 4e-3, "k_type": "fixed-free"});
    let out = parse(&api::column_json(&request.to_string()));

    assert_eq!(out["status"], "success");
    let data = &out["data"];
    assert_eq!(data["K"], 2.0);
    assert_eq!(data["L_eff"], 6.0);
    let expected = std::f64::consts::PI.powi(2) * 200e9 * 8e-6 / 36.0;
    assert_relative_eq!(data["P_cr"].as_f64().unwrap(), expected, max_relative = 1e-12);
}

#[test]
fn column_zero_length_is_an_error() {
    let request = json!({"length": 0, "E": 200e9, "I": 8e-6, "A": 4e-3});
    let out = parse(&api::column_json(&request.to_string()));
    assert_eq!(out["status"], "error");
}
