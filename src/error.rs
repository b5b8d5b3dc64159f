//! Error types for extraction, filtering and export.
//!
//! Only [`ConfigError`] and [`ExportError`] ever reach library callers.
//! [`InputError`] and [`PatternError`] are logged and absorbed by the
//! extractor; they exist so that the absorbed failure is still typed and
//! shows up with a readable message in the logs.

use std::path::PathBuf;

use crate::extractor::ExtractionMethod;

/// Input that could not be normalized as requested.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Input declared as JSON does not parse: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("Input is not valid UTF-8 (first invalid byte at offset {offset})")]
    InvalidUtf8 { offset: usize },
}

/// A single pattern failed while scanning one segment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("Pattern '{method}' produced more than {limit} matches in one segment")]
    MatchLimitExceeded {
        method: ExtractionMethod,
        limit: usize,
    },
}

/// Invalid filter, flag, or configuration values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("min_length ({min}) is greater than max_length ({max})")]
    LengthRange { min: usize, max: usize },

    #[error("min_confidence ({min}) is greater than max_confidence ({max})")]
    ConfidenceRange { min: f64, max: f64 },

    #[error("{name} must be within 0.0 and 1.0, got {value}")]
    ConfidenceOutOfBounds { name: &'static str, value: f64 },

    #[error("Unknown extraction pattern: {0}")]
    UnknownPattern(String),

    #[error("Unknown export format: {0} (expected files, json or csv)")]
    UnknownFormat(String),

    #[error("Unknown source type: {0} (expected json, html, xml, markdown or text)")]
    UnknownSourceType(String),

    #[error("No extraction patterns enabled")]
    NoPatterns,

    #[error("max_matches_per_pattern must be at least 1")]
    ZeroMatchLimit,

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Failures while writing an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize JSON export: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write CSV export: {0}")]
    Csv(#[from] csv::Error),
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
