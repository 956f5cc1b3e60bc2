//! Logging initialisation
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a `fmt`
//! layer. `RUST_LOG` wins over the configured level.

use crate::config::LoggingConfig;
use crate::{Error, Result};
use std::fs::OpenOptions;
use std::sync::{Mutex, OnceLock};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Build the filter: `RUST_LOG` first, then the configured directive
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(config.level.trim()).map_err(|e| {
            Error::Config(format!("Invalid log level '{}': {}", config.level, e))
        }),
    }
}

/// Initialise global logging
///
/// Only the first successful call installs a subscriber; later calls return
/// `Ok(())` without touching the global dispatcher.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    if INITIALIZED.get().is_some() {
        return Ok(());
    }

    let filter = build_filter(config)?;

    let (writer, ansi) = match &config.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    // A host application may already own the global dispatcher
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(ansi))
        .try_init()
        .is_ok();
    let _ = INITIALIZED.set(());

    if installed {
        tracing::debug!("Logging initialised (level: {})", config.level);
    }
    Ok(())
}
