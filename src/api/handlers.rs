//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{ErrorResponse, LogRecord, LogsQuery};
use crate::config::MicrogridConfig;
use crate::sim::logs::LogReport;

/// `GET /config` → 200 + `MicrogridConfig` JSON
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<MicrogridConfig> {
    Json(state.config.clone())
}

/// `GET /report` → 200 + `LogReport` JSON
pub async fn get_report(State(state): State<Arc<AppState>>) -> Json<LogReport> {
    Json(state.report.clone())
}

/// Returns log records, optionally filtered by step range.
///
/// `GET /logs` → 200 + `Vec<LogRecord>` JSON
/// `GET /logs?from=N&to=M` → filtered range (inclusive)
/// `GET /logs?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_logs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LogsQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let records: Vec<LogRecord> = (0..state.logs.len())
        .map(|i| LogRecord::from_logs(&state.logs, i))
        .filter(|r| r.step >= from && r.step <= to)
        .collect();

    Ok(Json(records))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::sim::Microgrid;
    use crate::sim::types::Action;

    fn make_test_state() -> Arc<AppState> {
        let mut mg = Microgrid::new(&MicrogridConfig::small()).unwrap();
        for _ in 0..24 {
            mg.run_timestep(Action::new(0.0, 500.0)).unwrap();
        }
        Arc::new(AppState::from_microgrid(&mg))
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let app = router(make_test_state());
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn config_returns_200() {
        let (status, json) = get_json("/config").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["max_timestep"], 48);
        assert!(json["battery"].get("capacity").is_some());
        assert_eq!(json["load"]["load_ts"].as_array().map(Vec::len), Some(48));
    }

    #[tokio::test]
    async fn report_returns_200() {
        let (status, json) = get_json("/report").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["steps"], 24);
        assert!(json.get("costs").is_some());
    }

    #[tokio::test]
    async fn logs_returns_all_steps() {
        let (status, json) = get_json("/logs").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().map(Vec::len), Some(24));
    }

    #[tokio::test]
    async fn logs_range_query() {
        let (status, json) = get_json("/logs?from=5&to=10").await;
        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().cloned().unwrap_or_default();
        assert_eq!(rows.len(), 6); // steps 5,6,7,8,9,10
        assert_eq!(rows[0]["step"], 5);
        assert_eq!(rows[5]["step"], 10);
    }

    #[tokio::test]
    async fn logs_invalid_range_returns_400() {
        let (status, json) = get_json("/logs?from=10&to=5").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json.get("error").is_some());
    }
}
