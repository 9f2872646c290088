//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use microgrid_sim::api::{AppState, router};
use microgrid_sim::sim::Microgrid;
use microgrid_sim::sim::types::Action;

/// Runs a full episode and returns the API state.
fn build_api_state() -> Arc<AppState> {
    let mut mg = Microgrid::new(&common::daily_config(24)).unwrap();
    while !mg.done() {
        mg.run_timestep(Action::new(200.0, 300.0)).unwrap();
    }
    Arc::new(AppState::from_microgrid(&mg))
}

async fn get(uri: &str) -> (StatusCode, serde_json::Value) {
    let app = router(build_api_state());
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn full_episode_config_endpoint() {
    let (status, json) = get("/config").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(json["max_timestep"], 24);
    assert_eq!(json["underprod_penalty"], 3.0);
    assert_eq!(json["battery"]["capacity"], 1e5);
    assert_eq!(
        json["grid"]["import_prices"].as_array().map(Vec::len),
        Some(24)
    );
    assert_eq!(json["pv"]["production_factor"], 1.0);
}

#[tokio::test]
async fn full_episode_logs_endpoint() {
    let (status, json) = get("/logs").await;
    assert_eq!(status, StatusCode::OK);

    let records = json.as_array().cloned().unwrap_or_default();
    assert_eq!(records.len(), 22);

    // Field names follow the CSV export columns
    let first = &records[0];
    for key in [
        "step",
        "balance",
        "battery",
        "grid",
        "pv",
        "load",
        "cost_total",
        "cost_overcharge",
        "cost_grid",
        "cost_error",
    ] {
        assert!(first.get(key).is_some(), "missing {key}");
    }
    assert_eq!(first["step"], 1);
    assert_eq!(first["grid"], 300.0);
}

#[tokio::test]
async fn full_episode_logs_range() {
    let (status, json) = get("/logs?from=10&to=15").await;
    assert_eq!(status, StatusCode::OK);

    let records = json.as_array().cloned().unwrap_or_default();
    assert_eq!(records.len(), 6);
    assert_eq!(records[0]["step"], 10);
    assert_eq!(records[5]["step"], 15);
}

#[tokio::test]
async fn full_episode_report_endpoint() {
    let (status, json) = get("/report").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["steps"], 22);
    assert_eq!(json["costs"].as_array().map(Vec::len), Some(4));
    assert_eq!(json["energies"].as_array().map(Vec::len), Some(5));
}
