//! Audiomack adapter
//!
//! Public search endpoint; songs without a `streaming.url` are skipped.
//! An API key is optional and forwarded when configured.

use super::lenient::{self, opt_string, opt_u32};
use super::{get_json, ProviderAdapter, ProviderError};
use async_trait::async_trait;
use fulltrack_common::{ProviderName, Track, TrackSource};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Audiomack API base URL
const AUDIOMACK_API_URL: &str = "https://api.audiomack.com/v1";

#[derive(Debug, Deserialize)]
struct AudiomackResponse {
    #[serde(default)]
    results: AudiomackResults,
}

#[derive(Debug, Default, Deserialize)]
struct AudiomackResults {
    #[serde(default)]
    songs: Vec<AudiomackSong>,
}

#[derive(Debug, Deserialize)]
struct AudiomackSong {
    #[serde(default, deserialize_with = "opt_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    artist: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    album: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    image: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    license: Option<String>,
    #[serde(default, deserialize_with = "opt_u32")]
    duration: Option<u32>,
    #[serde(default)]
    streaming: Option<AudiomackStreaming>,
}

#[derive(Debug, Deserialize)]
struct AudiomackStreaming {
    #[serde(default, deserialize_with = "opt_string")]
    url: Option<String>,
}

impl AudiomackSong {
    fn into_track(self) -> Option<Track> {
        let stream_url = self.streaming.and_then(|s| s.url)?;
        let id = self.id?;
        let title = self.title?;
        let duration = lenient::seconds(self.duration);

        let mut source = TrackSource::new(ProviderName::Audiomack, id);
        source.stream_url = Some(stream_url);
        source.streamable = Some(true);
        source.playable = Some(true);
        source.license = self.license;
        source.duration = duration;
        source.cors_support = Some(true);

        let mut track = Track::new(title).with_source(source);
        track.artist = self.artist;
        track.album = self.album;
        track.duration = duration;
        track.cover_url = self.image;
        Some(track)
    }
}

/// Audiomack adapter
pub struct AudiomackAdapter {
    http_client: Client,
    api_key: Option<String>,
    base_url: String,
    limit: u32,
}

impl AudiomackAdapter {
    pub fn new(http_client: Client, api_key: Option<String>, limit: u32) -> Self {
        Self {
            http_client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: AUDIOMACK_API_URL.to_string(),
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
impl ProviderAdapter for AudiomackAdapter {
    fn provider(&self) -> ProviderName {
        ProviderName::Audiomack
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Track>, ProviderError> {
        debug!(query = %query, "Querying Audiomack");

        let limit = self.limit.to_string();
        let mut params = vec![("query", query), ("limit", limit.as_str())];
        if let Some(key) = self.api_key.as_deref() {
            params.push(("api_key", key));
        }

        let request = self
            .http_client
            .get(format!("{}/search", self.base_url))
            .query(&params);

        let response: AudiomackResponse = get_json(request).await?;

        Ok(response
            .results
            .songs
            .into_iter()
            .filter_map(AudiomackSong::into_track)
            .collect())
    }
}
