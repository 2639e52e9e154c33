//! SoundCloud adapter
//!
//! User-generated audio. Each track lists several transcodings; the first
//! one using an allowed protocol is chosen and the client id is appended to
//! its URL so a player can resolve it.
//!
//! # API Reference
//! - Endpoint: https://api-v2.soundcloud.com/search/tracks
//! - Requires a client id; without one the adapter is disabled.
//! - `duration` is reported in milliseconds.

use super::lenient::{self, opt_bool, opt_string, opt_u64};
use super::{get_json, ProviderAdapter, ProviderError};
use async_trait::async_trait;
use fulltrack_common::{ProviderName, Track, TrackSource};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

/// SoundCloud API base URL
const SOUNDCLOUD_API_URL: &str = "https://api-v2.soundcloud.com";

/// `app_version` the web client sends
const APP_VERSION: &str = "1700000000";

/// Transcoding protocols a browser player can consume
pub const ALLOWED_PROTOCOLS: [&str; 2] = ["progressive", "hls"];

#[derive(Debug, Deserialize)]
struct SoundcloudResponse {
    #[serde(default)]
    collection: Vec<SoundcloudTrack>,
}

#[derive(Debug, Deserialize)]
struct SoundcloudTrack {
    #[serde(default, deserialize_with = "opt_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "opt_bool")]
    streamable: Option<bool>,
    #[serde(default)]
    media: Option<SoundcloudMedia>,
    #[serde(default, deserialize_with = "opt_string")]
    license: Option<String>,
    #[serde(default, deserialize_with = "opt_u64")]
    duration: Option<u64>,
    #[serde(default, deserialize_with = "opt_string")]
    artwork_url: Option<String>,
    #[serde(default)]
    user: Option<SoundcloudUser>,
}

#[derive(Debug, Default, Deserialize)]
struct SoundcloudMedia {
    #[serde(default)]
    transcodings: Vec<Transcoding>,
}

#[derive(Debug, Deserialize)]
struct Transcoding {
    #[serde(default, deserialize_with = "opt_string")]
    url: Option<String>,
    #[serde(default)]
    format: Option<TranscodingFormat>,
}

#[derive(Debug, Deserialize)]
struct TranscodingFormat {
    #[serde(default, deserialize_with = "opt_string")]
    protocol: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SoundcloudUser {
    #[serde(default, deserialize_with = "opt_string")]
    username: Option<String>,
}

/// First allowed transcoding URL with `client_id` appended
fn select_stream_url(transcodings: &[Transcoding], client_id: &str) -> Option<String> {
    transcodings
        .iter()
        .filter(|t| {
            t.format
                .as_ref()
                .and_then(|f| f.protocol.as_deref())
                .is_some_and(|p| ALLOWED_PROTOCOLS.contains(&p))
        })
        .filter_map(|t| t.url.as_deref())
        .find_map(|raw| {
            let mut url = Url::parse(raw).ok()?;
            url.query_pairs_mut().append_pair("client_id", client_id);
            Some(url.to_string())
        })
}

impl SoundcloudTrack {
    fn into_track(self, client_id: &str) -> Option<Track> {
        if !(self.streamable == Some(true) || self.media.is_some()) {
            return None;
        }

        let transcodings = self.media.map(|m| m.transcodings).unwrap_or_default();
        let Some(stream_url) = select_stream_url(&transcodings, client_id) else {
            debug!(id = ?self.id, "SoundCloud track has no usable transcoding");
            return None;
        };

        let id = self.id?;
        let title = self.title?;
        let duration = lenient::seconds_from_millis(self.duration);

        let mut source = TrackSource::new(ProviderName::Soundcloud, id);
        source.stream_url = Some(stream_url);
        source.streamable = Some(true);
        source.playable = Some(true);
        source.license = self.license;
        source.duration = duration;
        source.cors_support = Some(true);

        let mut track = Track::new(title).with_source(source);
        track.artist = self.user.and_then(|u| u.username);
        track.duration = duration;
        track.cover_url = self.artwork_url;
        Some(track)
    }
}

/// SoundCloud adapter
pub struct SoundcloudAdapter {
    http_client: Client,
    client_id: Option<String>,
    base_url: String,
    limit: u32,
}

impl SoundcloudAdapter {
    pub fn new(http_client: Client, client_id: Option<String>, limit: u32) -> Self {
        Self {
            http_client,
            client_id: client_id.filter(|id| !id.trim().is_empty()),
            base_url: SOUNDCLOUD_API_URL.to_string(),
            limit,
        }
    }

    /// Point the adapter at another API root (tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ProviderAdapter for SoundcloudAdapter {
    fn provider(&self) -> ProviderName {
        ProviderName::Soundcloud
    }

    fn is_configured(&self) -> bool {
        self.client_id.is_some()
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Track>, ProviderError> {
        let client_id = self
            .client_id
            .as_deref()
            .ok_or(ProviderError::NotConfigured("SOUNDCLOUD_CLIENT_ID"))?;

        debug!(query = %query, "Querying SoundCloud");

        let limit = self.limit.to_string();
        let request = self
            .http_client
            .get(format!("{}/search/tracks", self.base_url))
            .query(&[
                ("q", query),
                ("client_id", client_id),
                ("limit", limit.as_str()),
                ("app_version", APP_VERSION),
            ]);

        let response: SoundcloudResponse = get_json(request).await?;

        Ok(response
            .collection
            .into_iter()
            .filter_map(|t| t.into_track(client_id))
            .collect())
    }
}
