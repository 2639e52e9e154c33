//! Stream URL endpoint
//!
//! `GET /stream?url=<url>&provider=<name>` returns the URL unchanged for
//! providers that permit playback. No audio is relayed; metadata-only
//! providers are refused regardless of the URL.

use axum::{extract::Query, routing::get, Json, Router};
use fulltrack_common::is_metadata_only_provider;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct StreamParams {
    pub url: Option<String>,
    pub provider: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StreamResponse {
    pub proxied_url: String,
}

/// GET /stream
pub async fn stream_proxy(Query(params): Query<StreamParams>) -> ApiResult<Json<StreamResponse>> {
    let (Some(url), Some(provider)) = (params.url, params.provider) else {
        return Err(ApiError::BadRequest(
            "Query parameters 'url' and 'provider' are required".to_string(),
        ));
    };

    if is_metadata_only_provider(&provider) {
        warn!(provider = %provider, "Refused playback for metadata-only provider");
        return Err(ApiError::Forbidden(
            "Provider is metadata-only; playback not permitted".to_string(),
        ));
    }

    Ok(Json(StreamResponse { proxied_url: url }))
}

pub fn stream_routes() -> Router<AppState> {
    Router::new().route("/stream", get(stream_proxy))
}
