//! Provider adapters
//!
//! One adapter per external catalog. Each translates its provider's native
//! search response into [`Track`]s carrying exactly one [`TrackSource`].
//!
//! # Error isolation
//! Adapters report failures from [`ProviderAdapter::fetch`]; callers use
//! [`ProviderAdapter::search`], which turns every failure (network error,
//! non-2xx status, timeout, malformed payload) into an empty result list.
//! An adapter missing its credential short-circuits before any network call.
//!
//! # Adapters
//! 1. **jamendo** - royalty-free catalog, needs a client id
//! 2. **soundcloud** - user-generated audio, needs a client id
//! 3. **audiomack** - public search, optional API key
//! 4. **internet_archive** - public archive, stream URL derived from identifier
//!
//! [`TrackSource`]: fulltrack_common::TrackSource

pub mod audiomack;
pub mod internet_archive;
pub mod jamendo;
pub mod lenient;
pub mod soundcloud;

pub use audiomack::AudiomackAdapter;
pub use internet_archive::InternetArchiveAdapter;
pub use jamendo::JamendoAdapter;
pub use soundcloud::SoundcloudAdapter;

use async_trait::async_trait;
use fulltrack_common::config::Credentials;
use fulltrack_common::{ProviderName, Track};
use reqwest::{header, Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Default timeout for each outbound provider request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default number of tracks requested from each provider
pub const DEFAULT_RESULT_LIMIT: u32 = 10;

const USER_AGENT: &str = concat!("fulltrack-search/", env!("CARGO_PKG_VERSION"));

/// Failure inside a single provider call
///
/// Never crosses [`ProviderAdapter::search`].
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Connection failure or timeout
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream answered with a non-success status
    #[error("Upstream returned HTTP {0}")]
    Status(u16),

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Required credential not configured
    #[error("Provider not configured: {0}")]
    NotConfigured(&'static str),
}

/// Provider adapter interface
///
/// # Example
/// ```rust,ignore
/// let adapter: Arc<dyn ProviderAdapter> = Arc::new(InternetArchiveAdapter::new(client, 10));
/// let tracks = adapter.search("miles davis").await; // never fails
/// ```
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Provider every produced source is tagged with
    fn provider(&self) -> ProviderName;

    /// False when a required credential is missing
    fn is_configured(&self) -> bool {
        true
    }

    /// Query the upstream and map its payload
    async fn fetch(&self, query: &str) -> Result<Vec<Track>, ProviderError>;

    /// Infallible search: failures and the unconfigured state yield no tracks
    async fn search(&self, query: &str) -> Vec<Track> {
        let provider = self.provider();

        if !self.is_configured() {
            debug!(provider = %provider, "Provider disabled (no credential), skipping");
            return Vec::new();
        }

        match self.fetch(query).await {
            Ok(tracks) => {
                debug!(provider = %provider, count = tracks.len(), "Provider search complete");
                tracks
            }
            Err(e) => {
                warn!(
                    provider = %provider,
                    error = %e,
                    "Provider search failed, treating as no results"
                );
                Vec::new()
            }
        }
    }
}

/// Settings shared by every adapter
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub credentials: Credentials,
    pub timeout: Duration,
    pub result_limit: u32,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            timeout: DEFAULT_TIMEOUT,
            result_limit: DEFAULT_RESULT_LIMIT,
        }
    }
}

/// Build the HTTP client shared by all adapters
///
/// The timeout applies to each request as a whole.
pub fn build_http_client(timeout: Duration) -> Result<Client, ProviderError> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        header::HeaderValue::from_static(USER_AGENT),
    );

    Client::builder()
        .timeout(timeout)
        .default_headers(headers)
        .build()
        .map_err(|e| ProviderError::Network(format!("Failed to create HTTP client: {}", e)))
}

/// All adapters in priority order: jamendo, soundcloud, audiomack, internet archive
pub fn default_adapters(settings: &ProviderSettings, client: Client) -> Vec<Arc<dyn ProviderAdapter>> {
    let creds = &settings.credentials;
    let limit = settings.result_limit;

    vec![
        Arc::new(JamendoAdapter::new(
            client.clone(),
            creds.jamendo_client_id.clone(),
            limit,
        )),
        Arc::new(SoundcloudAdapter::new(
            client.clone(),
            creds.soundcloud_client_id.clone(),
            limit,
        )),
        Arc::new(AudiomackAdapter::new(
            client.clone(),
            creds.audiomack_api_key.clone(),
            limit,
        )),
        Arc::new(InternetArchiveAdapter::new(client, limit)),
    ]
}

/// Send a request and decode a JSON body
///
/// Body is read fully before decoding so a malformed payload surfaces as
/// `Parse`, not `Network`.
pub(crate) async fn get_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ProviderError> {
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            ProviderError::Network(format!("request timed out: {}", e))
        } else {
            ProviderError::Network(e.to_string())
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Status(status.as_u16()));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| ProviderError::Network(format!("Failed to read body: {}", e)))?;

    serde_json::from_slice(&body).map_err(|e| ProviderError::Parse(e.to_string()))
}

// ============================================================================
// Mock Adapter for Testing
// ============================================================================
