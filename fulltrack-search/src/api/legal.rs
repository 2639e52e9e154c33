//! Static terms-of-service advisory

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Advisory shown to front-end developers
pub const LEGAL_WARNING: &str = "Do not use YouTube, Spotify, or Deezer to serve full audio streams \
when their APIs or TOS forbid it. They commonly provide preview clips or enforce ad delivery. \
Use them for metadata only.";

#[derive(Debug, Serialize)]
pub struct LegalResponse {
    pub warning: &'static str,
}

/// GET /legal
pub async fn legal_note() -> Json<LegalResponse> {
    Json(LegalResponse {
        warning: LEGAL_WARNING,
    })
}

pub fn legal_routes() -> Router<AppState> {
    Router::new().route("/legal", get(legal_note))
}
