//! Configuration loading
//!
//! Bootstrap configuration is a single TOML file. Every field has a built-in
//! default, so an empty file (or no file at all) is a valid configuration.
//!
//! # Config File Resolution
//!
//! 1. Explicit path passed by the caller (highest priority)
//! 2. `SPX_CONFIG` environment variable
//! 3. `<config_dir>/spx/config.toml`
//! 4. Built-in defaults (fallback)
//!
//! A file named by (1) or (2) must exist. A missing file at (3) only logs a
//! warning.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "SPX_CONFIG";

/// Top-level configuration document
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct TomlConfig {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Playback tracker configuration
    pub tracker: TrackerConfig,

    /// Duration probe configuration
    pub probe: ProbeConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or EnvFilter directive, used when `RUST_LOG` is unset
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Playback tracker configuration
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Emit a trace event for every stream state transition
    pub trace_lifecycle: bool,
}

/// Duration probe configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProbeConfig {
    /// When false, every probe reports an unknown (0 ms) duration
    pub enabled: bool,

    /// Resource identifier to file mappings
    #[serde(rename = "resource")]
    pub resources: Vec<ResourceMapping>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            resources: Vec::new(),
        }
    }
}

/// Maps a numeric resource identifier to the file holding its data
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ResourceMapping {
    pub id: u32,
    pub path: PathBuf,
}

impl TomlConfig {
    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        debug!("Loaded config file: {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Resolve and load configuration following the documented priority order
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        // Priority 1: caller-supplied path
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        // Priority 2: environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.is_empty() {
                return Self::from_file(Path::new(&path));
            }
        }

        // Priority 3: platform config directory
        if let Some(path) = default_config_path() {
            if path.exists() {
                return Self::from_file(&path);
            }
            warn!(
                "Config file not found at {}, using built-in defaults",
                path.display()
            );
        }

        // Priority 4: built-in defaults
        Ok(Self::default())
    }

    /// Reject values that parse but cannot be used
    fn validate(&self) -> Result<()> {
        if self.logging.level.trim().is_empty() {
            return Err(Error::Config("logging.level must not be empty".to_string()));
        }

        let mut seen = std::collections::HashSet::new();
        for mapping in &self.probe.resources {
            if !seen.insert(mapping.id) {
                return Err(Error::Config(format!(
                    "Duplicate probe resource id: {}",
                    mapping.id
                )));
            }
        }
        Ok(())
    }
}

/// Default configuration file path for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("spx").join("config.toml"))
}
