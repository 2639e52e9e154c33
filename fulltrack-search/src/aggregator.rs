//! Aggregation orchestrator
//!
//! Fans a query out to every provider adapter concurrently, waits for all of
//! them, then filters and scores each track and concatenates the results in
//! provider priority order.
//!
//! # Error isolation
//! Each adapter runs in its own task. A failing adapter yields no tracks
//! (see [`ProviderAdapter::search`]); a panicking one is caught at the join
//! and logged. Neither affects the other providers' results.
//!
//! No deduplication across providers: the same song from two providers is
//! two separate tracks.

use crate::providers::ProviderAdapter;
use fulltrack_common::{best_source_index, ProviderName, SourcePolicy, Track};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Parallel provider search
///
/// # Example
/// ```rust,ignore
/// let aggregator = Aggregator::new(default_adapters(&settings, client));
/// let tracks = aggregator.search("lofi beats", false).await;
/// ```
pub struct Aggregator {
    adapters: Vec<Arc<dyn ProviderAdapter>>,
}

impl Aggregator {
    /// Create aggregator; vector order is provider priority
    pub fn new(adapters: Vec<Arc<dyn ProviderAdapter>>) -> Self {
        Self { adapters }
    }

    /// Providers in priority order
    pub fn provider_names(&self) -> Vec<ProviderName> {
        self.adapters.iter().map(|a| a.provider()).collect()
    }

    /// Providers whose credentials are present
    pub fn configured_providers(&self) -> Vec<ProviderName> {
        self.adapters
            .iter()
            .filter(|a| a.is_configured())
            .map(|a| a.provider())
            .collect()
    }

    /// Query every provider and merge the policy-compliant, scored results
    pub async fn search(&self, query: &str, allow_metadata_only: bool) -> Vec<Track> {
        let policy = SourcePolicy::new(allow_metadata_only);
        let per_provider = self.fan_out(query).await;

        let merged: Vec<Track> = per_provider
            .into_iter()
            .flat_map(|tracks| tracks.into_iter().filter_map(|t| refine_track(t, policy)))
            .collect();

        info!(
            query = %query,
            allow_metadata_only,
            count = merged.len(),
            "Search complete"
        );
        merged
    }

    /// Run all adapters concurrently; one result list per adapter, in order
    async fn fan_out(&self, query: &str) -> Vec<Vec<Track>> {
        let handles = self.adapters.iter().map(|adapter| {
            let adapter = Arc::clone(adapter);
            let query = query.to_string();
            let provider = adapter.provider();
            let handle = tokio::spawn(async move { adapter.search(&query).await });
            async move {
                match handle.await {
                    Ok(tracks) => {
                        debug!(provider = %provider, count = tracks.len(), "Provider returned");
                        tracks
                    }
                    Err(e) => {
                        warn!(
                            provider = %provider,
                            error = %e,
                            "Provider task aborted, treating as no results"
                        );
                        Vec::new()
                    }
                }
            }
        });

        join_all(handles).await
    }
}

/// Filter one track's sources and select its best source
///
/// Returns `None` when no source survives, unless the policy allows
/// metadata-only results, in which case the track is kept with no best
/// source.
pub fn refine_track(mut track: Track, policy: SourcePolicy) -> Option<Track> {
    track.sources = policy.apply(std::mem::take(&mut track.sources));

    if track.sources.is_empty() {
        if !policy.allow_metadata_only {
            return None;
        }
        track.best_source_index = None;
        return Some(track);
    }

    track.best_source_index = best_source_index(&track.sources);
    Some(track)
}
