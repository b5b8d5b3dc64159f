//! Configuration file handling.
//!
//! The file is TOML with three optional sections:
//!
//! ```toml
//! [extraction]
//! patterns = ["triple_backtick", "heredoc"]
//! min_confidence = 0.5
//! max_matches_per_pattern = 10000
//!
//! [export]
//! format = "json"
//! output = "out/code.json"
//! include_metadata = true
//!
//! [logging]
//! level = "INFO"
//! ```
//!
//! It is read from `--config PATH`, or from
//! `<config_dir>/code-extractor/config.toml` when that file exists.
//! Command-line flags override file values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::export::ExportFormat;
use crate::extractor::ExtractionConfig;
use crate::logging::LogLevel;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub format: ExportFormat,
    /// Destination; the format's default name when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    pub include_metadata: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

impl Config {
    /// Default config file location, if the platform has a config directory.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("code-extractor").join("config.toml"))
    }

    /// Load the default config file, or defaults when it does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load and validate the config file at `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.extraction.validate()?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
