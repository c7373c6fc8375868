//! Error types for sm-core

use thiserror::Error;

/// Main error type for sm-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type alias for sm-core
pub type Result<T> = std::result::Result<T, Error>;
