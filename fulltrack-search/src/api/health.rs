//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    /// Service status ("ok")
    pub status: String,
    /// Module name ("fulltrack-search")
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Current server time
    pub ts: DateTime<Utc>,
    /// Seconds since service started
    pub uptime_seconds: u64,
}

/// GET /health
///
/// Liveness only; does not contact any provider.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let now = Utc::now();
    let uptime_seconds = now
        .signed_duration_since(state.startup_time)
        .num_seconds()
        .max(0) as u64;

    Json(HealthResponse {
        ok: true,
        status: "ok".to_string(),
        module: "fulltrack-search".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ts: now,
        uptime_seconds,
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
