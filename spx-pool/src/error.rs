//! Error types for spx-pool
//!
//! The tracker itself is total over its inputs. Errors only arise while
//! probing sound sources and while building a pool from configuration.

use thiserror::Error;

/// Main error type for spx-pool
#[derive(Error, Debug)]
pub enum Error {
    /// Duration probe could not read the source
    #[error("Probe error: {0}")]
    Probe(String),

    /// Source kind or resource is not known to the probe
    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Required builder component missing
    #[error("Builder error: {0}")]
    Builder(String),

    /// Errors from shared configuration/logging code
    #[error(transparent)]
    Common(#[from] spx_common::Error),
}

/// Convenience Result type using spx-pool Error
pub type Result<T> = std::result::Result<T, Error>;
