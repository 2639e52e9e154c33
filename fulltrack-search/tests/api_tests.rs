//! Integration tests for fulltrack-search API endpoints
//!
//! Tests cover:
//! - /search validation, policy filtering, scoring and total-outage behavior
//! - /stream metadata-only refusal
//! - /health and /legal payloads
//!
//! Providers are replaced with scripted adapters; no network access.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use fulltrack_common::{ProviderName, Track, TrackSource};
use fulltrack_search::providers::{ProviderAdapter, ProviderError};
use fulltrack_search::{build_router, Aggregator, AppState};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot` method

/// Adapter returning a fixed result (or a fixed failure)
struct StubAdapter {
    provider: ProviderName,
    result: Result<Vec<Track>, u16>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ProviderAdapter for StubAdapter {
    fn provider(&self) -> ProviderName {
        self.provider
    }

    async fn fetch(&self, _query: &str) -> Result<Vec<Track>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone().map_err(ProviderError::Status)
    }
}

fn ok(provider: ProviderName, tracks: Vec<Track>) -> Arc<dyn ProviderAdapter> {
    Arc::new(StubAdapter {
        provider,
        result: Ok(tracks),
        calls: Arc::new(AtomicUsize::new(0)),
    })
}

/// Stub plus a handle on its fetch count
fn counted(provider: ProviderName, tracks: Vec<Track>) -> (Arc<dyn ProviderAdapter>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let adapter: Arc<dyn ProviderAdapter> = Arc::new(StubAdapter {
        provider,
        result: Ok(tracks),
        calls: Arc::clone(&calls),
    });
    (adapter, calls)
}

fn failing(provider: ProviderName) -> Arc<dyn ProviderAdapter> {
    Arc::new(StubAdapter {
        provider,
        result: Err(503),
        calls: Arc::new(AtomicUsize::new(0)),
    })
}

/// Streamable source, no license, 128 kbps
fn streamable_128k_track() -> Track {
    let mut source = TrackSource::new(ProviderName::Soundcloud, "sc-1");
    source.stream_url = Some("https://cdn.example.org/sc-1.mp3".to_string());
    source.streamable = Some(true);
    source.bitrate = Some(128);
    Track::new("Open Track").with_source(source)
}

fn spotify_track() -> Track {
    let mut source = TrackSource::new(ProviderName::Spotify, "sp-1");
    source.stream_url = Some("https://p.scdn.co/mp3-preview/sp-1".to_string());
    source.streamable = Some(true);
    source.playable = Some(true);
    Track::new("Chart Hit").with_source(source)
}

/// Metadata-only track whose source is explicitly unplayable
fn unplayable_spotify_track() -> Track {
    let mut source = TrackSource::new(ProviderName::Spotify, "sp-2");
    source.streamable = Some(false);
    Track::new("Preview Only").with_source(source)
}

fn setup_app(adapters: Vec<Arc<dyn ProviderAdapter>>) -> axum::Router {
    build_router(AppState::new(Aggregator::new(adapters)))
}

fn test_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app.oneshot(test_request(uri)).await.unwrap();
    let status = response.status();
    (status, extract_json(response.into_body()).await)
}

// =============================================================================
// /search
// =============================================================================

#[tokio::test]
async fn test_search_single_source_selected() {
    let app = setup_app(vec![ok(ProviderName::Soundcloud, vec![streamable_128k_track()])]);

    let (status, body) = get(app, "/search?q=open").await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["title"], "Open Track");
    assert_eq!(results[0]["best_source_index"], 0);
    assert_eq!(results[0]["sources"][0]["provider_name"], "soundcloud");
    assert_eq!(results[0]["sources"][0]["bitrate"], 128);
    assert!(results[0]["sources"][0]["cors_support"].is_null());
    assert!(results[0]["created_at"].is_string());
}

#[tokio::test]
async fn test_search_metadata_only_dropped_by_default() {
    let app = setup_app(vec![ok(ProviderName::Other, vec![spotify_track()])]);

    let (status, body) = get(app, "/search?q=chart").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_search_metadata_only_allowed_on_request() {
    let app = setup_app(vec![ok(
        ProviderName::Other,
        vec![spotify_track(), unplayable_spotify_track()],
    )]);

    let (status, body) = get(app, "/search?q=chart&allow_metadata_only=true").await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);

    assert_eq!(results[0]["title"], "Chart Hit");
    assert_eq!(results[0]["best_source_index"], 0);

    assert_eq!(results[1]["title"], "Preview Only");
    assert_eq!(results[1]["sources"].as_array().unwrap().len(), 0);
    assert!(results[1]["best_source_index"].is_null());
}

#[tokio::test]
async fn test_search_all_providers_down() {
    let app = setup_app(vec![
        failing(ProviderName::Jamendo),
        failing(ProviderName::Soundcloud),
        ok(ProviderName::Audiomack, Vec::new()),
        failing(ProviderName::InternetArchive),
    ]);

    let (status, body) = get(app, "/search?q=anything").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"results": []}));
}

#[tokio::test]
async fn test_search_partial_outage_keeps_other_results() {
    let app = setup_app(vec![
        failing(ProviderName::Jamendo),
        ok(ProviderName::Soundcloud, vec![streamable_128k_track()]),
    ]);

    let (status, body) = get(app, "/search?q=open").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_search_query_too_short() {
    let (adapter, calls) = counted(ProviderName::Soundcloud, vec![streamable_128k_track()]);
    let app = setup_app(vec![adapter]);

    let (status, body) = get(app, "/search?q=a").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert_eq!(calls.load(Ordering::SeqCst), 0, "No provider contacted for a short query");
}

#[tokio::test]
async fn test_search_query_missing() {
    let (adapter, calls) = counted(ProviderName::Soundcloud, vec![streamable_128k_track()]);
    let app = setup_app(vec![adapter]);

    let (status, _) = get(app, "/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_search_valid_query_contacts_provider_once() {
    let (adapter, calls) = counted(ProviderName::Soundcloud, vec![streamable_128k_track()]);
    let app = setup_app(vec![adapter]);

    let (status, _) = get(app, "/search?q=ok").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_search_invalid_flag() {
    let (adapter, calls) = counted(ProviderName::Soundcloud, Vec::new());
    let app = setup_app(vec![adapter]);

    let (status, body) = get(app, "/search?q=ok&allow_metadata_only=perhaps").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("allow_metadata_only"));
}

#[tokio::test]
async fn test_search_no_dedup_across_providers() {
    let app = setup_app(vec![
        ok(ProviderName::Soundcloud, vec![streamable_128k_track()]),
        ok(ProviderName::Audiomack, vec![streamable_128k_track()]),
    ]);

    let (_, body) = get(app, "/search?q=open").await;
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
}

// =============================================================================
// /stream
// =============================================================================

#[tokio::test]
async fn test_stream_youtube_forbidden() {
    for uri in [
        "/stream?url=https%3A%2F%2Fyoutube.com%2Fwatch%3Fv%3Dabc&provider=youtube",
        "/stream?url=anything&provider=youtube",
        "/stream?url=&provider=YouTube",
    ] {
        let app = setup_app(Vec::new());
        let (status, body) = get(app, uri).await;

        assert_eq!(status, StatusCode::FORBIDDEN, "{}", uri);
        assert_eq!(body["error"]["code"], "FORBIDDEN");
    }
}

#[tokio::test]
async fn test_stream_allowed_provider_echoes_url() {
    let app = setup_app(Vec::new());

    let (status, body) = get(
        app,
        "/stream?url=https%3A%2F%2Farchive.org%2Fdownload%2Fx%2Fx.mp3&provider=internet_archive",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["proxied_url"], "https://archive.org/download/x/x.mp3");
}

#[tokio::test]
async fn test_stream_missing_params() {
    let app = setup_app(Vec::new());

    let (status, _) = get(app, "/stream?provider=jamendo").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// /health and /legal
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app(Vec::new());

    let (status, body) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "fulltrack-search");
    assert!(body["version"].is_string());
    assert!(body["ts"].is_string());
    assert!(body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_legal_endpoint() {
    let app = setup_app(Vec::new());

    let (status, body) = get(app, "/legal").await;

    assert_eq!(status, StatusCode::OK);
    let warning = body["warning"].as_str().unwrap();
    assert!(warning.contains("YouTube"));
    assert!(warning.contains("Spotify"));
    assert!(warning.contains("Deezer"));
}

#[tokio::test]
async fn test_cors_headers_present() {
    let app = setup_app(Vec::new());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("origin", "https://player.example.org")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}
