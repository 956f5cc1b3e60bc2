//! Common error types for SPX

use thiserror::Error;

/// Common result type for SPX operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the SPX crates
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML document could not be parsed
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}
