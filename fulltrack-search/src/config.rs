//! Service configuration
//!
//! Resolution order for each value:
//! 1. Command-line argument
//! 2. Environment variable
//! 3. TOML config file (`--config`)
//! 4. Built-in default
//!
//! Provider credentials have no default. Their absence disables the
//! provider; it is never a startup failure.

use clap::Parser;
use fulltrack_common::config::{load_optional_toml_config, Credentials, TomlConfig};
use fulltrack_common::{Error, Result};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::providers::{ProviderSettings, DEFAULT_RESULT_LIMIT};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Command-line arguments for fulltrack-search
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "fulltrack-search")]
#[command(about = "Full-track music search aggregator")]
#[command(version)]
pub struct Args {
    /// Address to bind
    #[arg(long, env = "FULLTRACK_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "FULLTRACK_PORT")]
    pub port: Option<u16>,

    /// Optional TOML config file
    #[arg(short, long, env = "FULLTRACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Jamendo client id (provider disabled when unset)
    #[arg(long, env = "JAMENDO_CLIENT_ID", hide_env_values = true)]
    pub jamendo_client_id: Option<String>,

    /// SoundCloud client id (provider disabled when unset)
    #[arg(long, env = "SOUNDCLOUD_CLIENT_ID", hide_env_values = true)]
    pub soundcloud_client_id: Option<String>,

    /// Audiomack API key (optional)
    #[arg(long, env = "AUDIOMACK_API_KEY", hide_env_values = true)]
    pub audiomack_api_key: Option<String>,

    /// Per-provider request timeout in seconds
    #[arg(long, env = "FULLTRACK_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Max tracks requested from each provider
    #[arg(long, env = "FULLTRACK_RESULT_LIMIT")]
    pub result_limit: Option<u32>,
}

impl Args {
    fn credentials(&self) -> Credentials {
        Credentials {
            jamendo_client_id: self.jamendo_client_id.clone(),
            soundcloud_client_id: self.soundcloud_client_id.clone(),
            audiomack_api_key: self.audiomack_api_key.clone(),
        }
    }
}

/// Fully resolved configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: IpAddr,
    pub port: u16,
    pub providers: ProviderSettings,
}

impl ServiceConfig {
    /// Load the config file named by `args` (if any) and merge
    pub fn load(args: &Args) -> Result<Self> {
        let toml = load_optional_toml_config(args.config.as_deref())?;
        Self::resolve(args, &toml)
    }

    /// Merge arguments over a parsed config file
    pub fn resolve(args: &Args, toml: &TomlConfig) -> Result<Self> {
        let host_str = args
            .host
            .clone()
            .or_else(|| toml.host.clone())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host: IpAddr = host_str
            .parse()
            .map_err(|e| Error::Config(format!("Invalid host '{}': {}", host_str, e)))?;

        let port = args.port.or(toml.port).unwrap_or(DEFAULT_PORT);

        let timeout_secs = args
            .timeout_secs
            .or(toml.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be greater than 0".to_string()));
        }

        let result_limit = args
            .result_limit
            .or(toml.result_limit)
            .unwrap_or(DEFAULT_RESULT_LIMIT);
        if result_limit == 0 {
            return Err(Error::Config("result_limit must be greater than 0".to_string()));
        }

        Ok(Self {
            host,
            port,
            providers: ProviderSettings {
                credentials: args.credentials().or(&toml.credentials),
                timeout: Duration::from_secs(timeout_secs),
                result_limit,
            },
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
