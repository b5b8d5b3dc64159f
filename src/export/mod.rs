//! Exporting extraction results.
//!
//! - [`ExportFormat::Files`] - one file per candidate in a directory
//! - [`ExportFormat::Json`] - a pretty-printed JSON array
//! - [`ExportFormat::Csv`] - a CSV table

pub mod files;
pub mod json;
pub mod table;

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ConfigError, ExportError};
use crate::extractor::ExtractedCode;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Files,
    Json,
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Files => "files",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    /// Default output location when none is given.
    pub fn default_output(&self) -> &'static str {
        match self {
            Self::Files => "extracted_code",
            Self::Json => "extracted_code.json",
            Self::Csv => "extracted_code.csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "files" => Ok(Self::Files),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

/// Write `codes` to `destination` in `format`.
///
/// For [`ExportFormat::Files`] `destination` is a directory; otherwise it is
/// a file whose parent directories are created as needed.
pub fn export(
    codes: &[ExtractedCode],
    format: ExportFormat,
    destination: &Path,
    include_metadata: bool,
) -> Result<(), ExportError> {
    info!(
        count = codes.len(),
        %format,
        destination = %destination.display(),
        "Exporting extracted code"
    );
    match format {
        ExportFormat::Files => files::write(codes, destination, include_metadata)?,
        ExportFormat::Json => {
            create_parent(destination)?;
            json::write(codes, destination, include_metadata)?;
        }
        ExportFormat::Csv => {
            create_parent(destination)?;
            table::write(codes, destination, include_metadata)?;
        }
    }
    info!("Export completed");
    Ok(())
}

fn create_parent(path: &Path) -> Result<(), ExportError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| ExportError::io(parent, e))
        }
        _ => Ok(()),
    }
}
