//! # Fulltrack Common Library
//!
//! Shared code for the fulltrack aggregation service:
//! - Track and source data model
//! - Source policy filter (what may be surfaced for playback)
//! - Source scoring and best-source selection
//! - Configuration loading (TOML + environment)

pub mod config;
pub mod error;
pub mod models;
pub mod policy;
pub mod scoring;

pub use error::{Error, Result};
pub use models::{ProviderName, SearchResponse, Track, TrackSource};
pub use policy::{filter_sources, is_metadata_only_provider, SourcePolicy};
pub use scoring::{best_source_index, score_source};
