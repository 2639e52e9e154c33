//! Track and source data model
//!
//! Every search request builds these fresh: an adapter constructs them, the
//! policy filter narrows `sources`, the scorer sets `best_source_index`, and
//! the result is serialized. Nothing here outlives a request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ========================================
// Provider identifiers
// ========================================

/// External catalog a source came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderName {
    Jamendo,
    Soundcloud,
    Audiomack,
    InternetArchive,
    UserUpload,
    Spotify,
    Deezer,
    Youtube,
    Other,
}

impl ProviderName {
    /// Providers whose terms forbid serving full audio through their API
    pub fn is_metadata_only(&self) -> bool {
        crate::policy::METADATA_ONLY_PROVIDERS.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderName::Jamendo => "jamendo",
            ProviderName::Soundcloud => "soundcloud",
            ProviderName::Audiomack => "audiomack",
            ProviderName::InternetArchive => "internet_archive",
            ProviderName::UserUpload => "user_upload",
            ProviderName::Spotify => "spotify",
            ProviderName::Deezer => "deezer",
            ProviderName::Youtube => "youtube",
            ProviderName::Other => "other",
        }
    }
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jamendo" => Ok(ProviderName::Jamendo),
            "soundcloud" => Ok(ProviderName::Soundcloud),
            "audiomack" => Ok(ProviderName::Audiomack),
            "internet_archive" => Ok(ProviderName::InternetArchive),
            "user_upload" => Ok(ProviderName::UserUpload),
            "spotify" => Ok(ProviderName::Spotify),
            "deezer" => Ok(ProviderName::Deezer),
            "youtube" => Ok(ProviderName::Youtube),
            "other" => Ok(ProviderName::Other),
            _ => Err(format!("Invalid provider: '{}'", s)),
        }
    }
}

// ========================================
// Track / source entities
// ========================================

/// One provider's offering of a track
///
/// `streamable` and `playable` are tri-state: `None` means the provider did
/// not report the flag, which the policy filter treats differently from an
/// explicit `Some(false)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSource {
    pub provider_name: ProviderName,
    pub source_id: Option<String>,
    pub stream_url: Option<String>,
    pub download_url: Option<String>,
    pub streamable: Option<bool>,
    pub playable: Option<bool>,
    pub audiodownload_allowed: Option<bool>,
    pub zip_allowed: Option<bool>,
    pub downloadable: Option<bool>,
    pub license: Option<String>,
    /// kbps
    pub bitrate: Option<u32>,
    /// Whole seconds
    pub duration: Option<u32>,
    pub cors_support: Option<bool>,
    pub region: Option<String>,
}

impl TrackSource {
    /// Source with every optional attribute unknown
    pub fn new(provider_name: ProviderName, source_id: impl Into<String>) -> Self {
        Self {
            provider_name,
            source_id: Some(source_id.into()),
            stream_url: None,
            download_url: None,
            streamable: None,
            playable: None,
            audiodownload_allowed: None,
            zip_allowed: None,
            downloadable: None,
            license: None,
            bitrate: None,
            duration: None,
            cors_support: None,
            region: None,
        }
    }

    /// True when at least one of stream/download URL is present
    pub fn has_url(&self) -> bool {
        self.stream_url.is_some() || self.download_url.is_some()
    }
}

/// One logical song, possibly backed by several sources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Whole seconds
    pub duration: Option<u32>,
    pub cover_url: Option<String>,
    /// Provider response order
    pub sources: Vec<TrackSource>,
    /// Index into `sources`, set only after scoring
    pub best_source_index: Option<usize>,
    pub created_at: DateTime<Utc>,
}

impl Track {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: None,
            album: None,
            duration: None,
            cover_url: None,
            sources: Vec::new(),
            best_source_index: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_source(mut self, source: TrackSource) -> Self {
        self.sources.push(source);
        self
    }

    /// The best-ranked source, if scoring selected one
    pub fn best_source(&self) -> Option<&TrackSource> {
        self.best_source_index.and_then(|i| self.sources.get(i))
    }
}

/// Body of `GET /search`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<Track>,
}
