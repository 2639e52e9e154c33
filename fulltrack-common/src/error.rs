//! Common error types for fulltrack

use thiserror::Error;

/// Common result type for fulltrack operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the fulltrack crates
#[derive(Error, Debug)]
pub enum Error {
    /// TOML config file could not be parsed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
