//! Configuration loading
//!
//! Settings come from an optional TOML file and cover the decoder
//! front end and report rendering. Command-line flags take precedence
//! over file values, which take precedence over the built-in defaults.
//!
//! # Example
//! ```ignore
//! let config = Config::load("somfy.toml")?;
//! let table = RemoteTable::load(&config.decoder.remotes_file);
//! ```

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::decoder::FilterMode;
use crate::resolver::DEFAULT_REMOTES_FILE;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Decoder front-end settings
    #[serde(default)]
    pub decoder: DecoderConfig,

    /// Report rendering settings
    #[serde(default)]
    pub report: ReportConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

// =============================================================================
// Decoder Configuration
// =============================================================================

/// Decoder front-end configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DecoderConfig {
    /// Level filter applied ahead of edge detection
    #[serde(default)]
    pub filter: FilterMode,

    /// Path of the remote name table
    #[serde(default = "default_remotes_file")]
    pub remotes_file: String,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            filter: FilterMode::default(),
            remotes_file: default_remotes_file(),
        }
    }
}

fn default_remotes_file() -> String {
    DEFAULT_REMOTES_FILE.to_string()
}

// =============================================================================
// Report Configuration
// =============================================================================

/// Report rendering configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfig {
    /// Print each frame on a single line
    #[serde(default)]
    pub one_line: bool,

    /// Print numeric fields only, without name annotations
    #[serde(default)]
    pub numeric: bool,
}

// =============================================================================
// Tests
// =============================================================================
