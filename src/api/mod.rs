//! REST API for a finished microgrid run.
//!
//! Provides three GET endpoints:
//! - `/config`: configuration snapshot of the microgrid
//! - `/logs`: logged energies and costs with optional range filtering
//! - `/report`: summary statistics of the logs

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::config::MicrogridConfig;
use crate::sim::Microgrid;
use crate::sim::logs::{LogReport, Logs};

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the run completes and wrapped in `Arc`; no locks
/// needed since all data is read-only.
pub struct AppState {
    /// Configuration snapshot of the microgrid.
    pub config: MicrogridConfig,
    /// Summary of the logs.
    pub report: LogReport,
    /// Logged energies and costs.
    pub logs: Logs,
}

impl AppState {
    /// Captures the configuration, logs and report of a microgrid.
    pub fn from_microgrid(microgrid: &Microgrid) -> Self {
        Self {
            config: microgrid.config(),
            report: microgrid.show_logs(),
            logs: microgrid.get_logs().clone(),
        }
    }
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/config", get(handlers::get_config))
        .route("/logs", get(handlers::get_logs))
        .route("/report", get(handlers::get_report))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
