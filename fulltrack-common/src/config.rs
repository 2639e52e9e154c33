//! Configuration loading
//!
//! Priority for every value: command line / environment (handled by the
//! binary's argument parser) → TOML config file → built-in default.
//! Provider credentials have no default; a missing credential disables the
//! provider that needs it, it never fails startup.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// Optional TOML config file
///
/// ```toml
/// host = "127.0.0.1"
/// port = 8000
/// timeout_secs = 15
/// result_limit = 10
///
/// [credentials]
/// jamendo_client_id = "..."
/// soundcloud_client_id = "..."
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    /// Per-provider outbound request timeout
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Max tracks requested from each provider
    #[serde(default)]
    pub result_limit: Option<u32>,
    #[serde(default)]
    pub credentials: Credentials,
}

/// Provider credentials; `None` disables the provider that needs it
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub jamendo_client_id: Option<String>,
    #[serde(default)]
    pub soundcloud_client_id: Option<String>,
    #[serde(default)]
    pub audiomack_api_key: Option<String>,
}

impl Credentials {
    /// Merge two credential sets, preferring `self` (CLI/ENV) over `fallback` (TOML)
    ///
    /// Blank values on either side count as unset.
    pub fn or(self, fallback: &Credentials) -> Credentials {
        Credentials {
            jamendo_client_id: resolve_credential(
                "jamendo_client_id",
                self.jamendo_client_id,
                fallback.jamendo_client_id.as_deref(),
            ),
            soundcloud_client_id: resolve_credential(
                "soundcloud_client_id",
                self.soundcloud_client_id,
                fallback.soundcloud_client_id.as_deref(),
            ),
            audiomack_api_key: resolve_credential(
                "audiomack_api_key",
                self.audiomack_api_key,
                fallback.audiomack_api_key.as_deref(),
            ),
        }
    }
}

/// Validate credential (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

fn resolve_credential(name: &str, primary: Option<String>, toml: Option<&str>) -> Option<String> {
    let primary = primary.filter(|k| is_valid_key(k));
    let toml = toml.filter(|k| is_valid_key(k));

    match (primary, toml) {
        (Some(key), Some(_)) => {
            warn!(
                "{} found in both environment/command line and TOML. Using environment/command line.",
                name
            );
            Some(key)
        }
        (Some(key), None) => {
            info!("{} loaded from environment/command line", name);
            Some(key)
        }
        (None, Some(key)) => {
            info!("{} loaded from TOML config", name);
            Some(key.to_string())
        }
        (None, None) => None,
    }
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config = toml::from_str(&content)?;
    Ok(config)
}

/// Load the config file if one was named
///
/// No path, or a path that does not exist, yields defaults (the latter with
/// a warning). A file that exists but cannot be parsed is an error.
pub fn load_optional_toml_config(path: Option<&Path>) -> Result<TomlConfig> {
    let Some(path) = path else {
        return Ok(TomlConfig::default());
    };

    if !path.exists() {
        warn!("Config file {} not found, using defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let config = load_toml_config(path)?;
    info!("Loaded config file {}", path.display());
    Ok(config)
}
