//! fulltrack-search library
//!
//! Aggregates track search results from several music providers, keeps only
//! sources that may legally and technically be streamed, and ranks them.
//! Exposed as a library so the router can be exercised in integration tests.

pub mod aggregator;
pub mod api;
pub mod config;
pub mod error;
pub mod providers;

pub use crate::aggregator::Aggregator;
pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Provider fan-out and ranking pipeline
    pub aggregator: Arc<Aggregator>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(aggregator: Aggregator) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// All origins are allowed; the service is meant to be called from a browser
/// front end hosted elsewhere.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::search_routes())
        .merge(api::stream_routes())
        .merge(api::health_routes())
        .merge(api::legal_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
