//! Track search endpoint
//!
//! `GET /search?q=<query>&allow_metadata_only=<bool>` fans out to every
//! provider and returns `{ "results": [Track, ...] }`. Provider outages only
//! shrink the result list; the endpoint itself fails only on invalid input.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use fulltrack_common::SearchResponse;
use serde::Deserialize;
use tracing::debug;

use crate::{ApiError, ApiResult, AppState};

/// Shortest accepted query, in characters
pub const MIN_QUERY_CHARS: usize = 2;

/// Query parameters for search
///
/// Both fields are taken as raw strings so validation failures produce the
/// service's JSON error body instead of the extractor's plain-text one.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub allow_metadata_only: Option<String>,
}

/// Parse a boolean query flag (`true/false`, `1/0`, `yes/no`, `on/off`)
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn validate_query(q: Option<String>) -> ApiResult<String> {
    match q {
        Some(q) if q.chars().count() >= MIN_QUERY_CHARS => Ok(q),
        _ => Err(ApiError::BadRequest(format!(
            "Query parameter 'q' is required and must be at least {} characters",
            MIN_QUERY_CHARS
        ))),
    }
}

/// GET /search
pub async fn search_tracks(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchResponse>> {
    let query = validate_query(params.q)?;

    let allow_metadata_only = match params.allow_metadata_only.as_deref() {
        None => false,
        Some(raw) => parse_flag(raw).ok_or_else(|| {
            ApiError::BadRequest(format!(
                "Invalid value for 'allow_metadata_only': {}",
                raw
            ))
        })?,
    };

    debug!(query = %query, allow_metadata_only, "Search request");

    let results = state.aggregator.search(&query, allow_metadata_only).await;
    Ok(Json(SearchResponse { results }))
}

pub fn search_routes() -> Router<AppState> {
    Router::new().route("/search", get(search_tracks))
}
