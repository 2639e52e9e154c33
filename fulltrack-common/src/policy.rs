//! Source policy filter
//!
//! Decides which sources may be surfaced to a client. Rules, in order:
//! 1. Metadata-only providers are dropped unless the caller opts in.
//! 2. Sources with neither a stream nor a download URL are dropped.
//! 3. An explicit `streamable = false` or `playable = false` drops the source.
//! 4. Both flags unknown drops the source unless the caller opts in.

use crate::models::{ProviderName, TrackSource};
use tracing::trace;

/// Providers whose terms forbid full-audio playback
pub const METADATA_ONLY_PROVIDERS: [ProviderName; 3] = [
    ProviderName::Spotify,
    ProviderName::Deezer,
    ProviderName::Youtube,
];

/// Check a raw provider string (as received on `/stream`)
///
/// Unknown names are not metadata-only.
pub fn is_metadata_only_provider(provider: &str) -> bool {
    provider
        .parse::<ProviderName>()
        .map(|p| p.is_metadata_only())
        .unwrap_or(false)
}

/// Per-request filter settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourcePolicy {
    pub allow_metadata_only: bool,
}

impl SourcePolicy {
    pub fn new(allow_metadata_only: bool) -> Self {
        Self { allow_metadata_only }
    }

    /// Returns the rule that rejects `source`, or `None` if it may be surfaced
    fn rejection(&self, source: &TrackSource) -> Option<&'static str> {
        if source.provider_name.is_metadata_only() && !self.allow_metadata_only {
            return Some("metadata-only provider");
        }
        if !source.has_url() {
            return Some("no stream or download url");
        }
        if source.streamable == Some(false) || source.playable == Some(false) {
            return Some("explicitly not playable");
        }
        if source.streamable.is_none() && source.playable.is_none() && !self.allow_metadata_only {
            return Some("playability unknown");
        }
        None
    }

    pub fn keeps(&self, source: &TrackSource) -> bool {
        match self.rejection(source) {
            Some(reason) => {
                trace!(
                    provider = %source.provider_name,
                    source_id = ?source.source_id,
                    reason,
                    "Dropping source"
                );
                false
            }
            None => true,
        }
    }

    /// Narrow `sources` to the ones this policy allows, preserving order
    pub fn apply(&self, sources: Vec<TrackSource>) -> Vec<TrackSource> {
        sources.into_iter().filter(|s| self.keeps(s)).collect()
    }
}

/// Convenience wrapper around [`SourcePolicy::apply`]
pub fn filter_sources(sources: Vec<TrackSource>, allow_metadata_only: bool) -> Vec<TrackSource> {
    SourcePolicy::new(allow_metadata_only).apply(sources)
}
