//! Jamendo adapter
//!
//! Royalty-free catalog with a direct MP3 stream URL per track and an
//! optional download URL when the artist allows downloads.
//!
//! # API Reference
//! - Endpoint: https://api.jamendo.com/v3.0/tracks
//! - Documentation: https://developer.jamendo.com/v3.0/tracks
//! - Requires a client id; without one the adapter is disabled.

use super::lenient::{self, opt_bool, opt_string, opt_u32};
use super::{get_json, ProviderAdapter, ProviderError};
use async_trait::async_trait;
use fulltrack_common::{ProviderName, Track, TrackSource};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Jamendo API base URL
const JAMENDO_API_URL: &str = "https://api.jamendo.com/v3.0";

#[derive(Debug, Deserialize)]
struct JamendoResponse {
    #[serde(default)]
    results: Vec<JamendoTrack>,
}

#[derive(Debug, Deserialize)]
struct JamendoTrack {
    #[serde(default, deserialize_with = "opt_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    artist_name: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    album_name: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    image: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    audio: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    audiodownload: Option<String>,
    #[serde(default, deserialize_with = "opt_bool")]
    audiodownload_allowed: Option<bool>,
    #[serde(default, deserialize_with = "opt_bool")]
    zip_allowed: Option<bool>,
    #[serde(default, deserialize_with = "opt_string")]
    license: Option<String>,
    /// Shape varies with the `include` parameter, so navigated loosely
    #[serde(default)]
    licenses: Option<Value>,
    #[serde(default, deserialize_with = "opt_u32")]
    duration: Option<u32>,
}

impl JamendoTrack {
    /// Direct license string, else the nested creative-commons name
    fn license_name(&self) -> Option<String> {
        self.license.clone().or_else(|| {
            self.licenses
                .as_ref()
                .and_then(|l| l.get("cc"))
                .and_then(|cc| cc.get("name"))
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        })
    }

    fn into_track(self) -> Option<Track> {
        let license = self.license_name();
        let id = self.id?;
        let title = self.name?;

        let download_allowed = self.audiodownload_allowed.unwrap_or(false);
        let download_url = if download_allowed { self.audiodownload } else { None };
        let has_stream = self.audio.is_some();
        let duration = lenient::seconds(self.duration);

        let mut source = TrackSource::new(ProviderName::Jamendo, id);
        source.streamable = Some(has_stream);
        source.playable = Some(has_stream);
        source.stream_url = self.audio;
        source.downloadable = Some(download_url.is_some());
        source.download_url = download_url;
        source.audiodownload_allowed = Some(download_allowed);
        source.zip_allowed = Some(self.zip_allowed.unwrap_or(false));
        source.license = license;
        source.duration = duration;
        source.cors_support = Some(true);

        let mut track = Track::new(title).with_source(source);
        track.artist = self.artist_name;
        track.album = self.album_name;
        track.duration = duration;
        track.cover_url = self.image;
        Some(track)
    }
}

/// Jamendo adapter
pub struct JamendoAdapter {
    http_client: Client,
    client_id: Option<String>,
    base_url: String,
    limit: u32,
}

impl JamendoAdapter {
    pub fn new(http_client: Client, client_id: Option<String>, limit: u32) -> Self {
        Self {
            http_client,
            client_id: client_id.filter(|id| !id.trim().is_empty()),
            base_url: JAMENDO_API_URL.to_string(),
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
impl ProviderAdapter for JamendoAdapter {
    fn provider(&self) -> ProviderName {
        ProviderName::Jamendo
    }

    fn is_configured(&self) -> bool {
        self.client_id.is_some()
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Track>, ProviderError> {
        let client_id = self
            .client_id
            .as_deref()
            .ok_or(ProviderError::NotConfigured("JAMENDO_CLIENT_ID"))?;

        debug!(query = %query, "Querying Jamendo");

        let limit = self.limit.to_string();
        let request = self
            .http_client
            .get(format!("{}/tracks", self.base_url))
            .query(&[
                ("client_id", client_id),
                ("format", "json"),
                ("limit", limit.as_str()),
                ("search", query),
                ("include", "licenses+musicinfo+stats"),
                ("audioformat", "mp32"),
            ]);

        let response: JamendoResponse = get_json(request).await?;

        Ok(response
            .results
            .into_iter()
            .filter_map(JamendoTrack::into_track)
            .collect())
    }
}
