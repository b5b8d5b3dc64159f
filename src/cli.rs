//! Command-line interface definition.
//!
//! Lives in the library so the `xtask` crate can render the man page and
//! shell completions from the same definition.

use std::path::PathBuf;

use clap::Parser;
use once_cell::sync::Lazy;

use crate::export::ExportFormat;
use crate::extractor::{ExtractionConfig, ExtractionMethod, InputType, SourceType};
use crate::logging::LogLevel;
use crate::query::CodeFilter;

/// Version plus git SHA (dev builds) and build date.
static LONG_VERSION: Lazy<String> = Lazy::new(|| {
    let date = option_env!("CE_BUILD_DATE").unwrap_or("unknown");
    match option_env!("VERGEN_GIT_SHA") {
        Some(sha) => format!("{} ({} {})", env!("CARGO_PKG_VERSION"), sha, date),
        None => format!("{} ({})", env!("CARGO_PKG_VERSION"), date),
    }
});

/// Find code blocks in text, chat transcripts, HTML and Markdown, then
/// classify, filter and export them.
#[derive(Debug, Parser)]
#[command(name = "code-extractor", version, long_version = LONG_VERSION.as_str())]
#[command(about = "Extract, classify and export code blocks from text, JSON, HTML and Markdown")]
pub struct Cli {
    /// Input file, or `-` to read standard input
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// How to interpret the input
    #[arg(long, value_enum, default_value_t = InputType::Auto)]
    pub input_type: InputType,

    /// Extraction patterns to enable, comma separated (default: all)
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub patterns: Option<Vec<ExtractionMethod>>,

    /// Drop candidates scoring below this confidence
    #[arg(long, value_name = "F")]
    pub min_confidence: Option<f64>,

    /// Drop candidates scoring above this confidence
    #[arg(long, value_name = "F")]
    pub max_confidence: Option<f64>,

    /// Keep only this language (aliases such as `js` or `py` accepted)
    #[arg(long)]
    pub language: Option<String>,

    /// Keep only candidates from this source type
    #[arg(long, value_name = "TYPE")]
    pub source_type: Option<SourceType>,

    /// Keep only candidates from conversation messages with this role
    #[arg(long)]
    pub role: Option<String>,

    /// Minimum content length in characters
    #[arg(long, value_name = "N")]
    pub min_length: Option<usize>,

    /// Maximum content length in characters
    #[arg(long, value_name = "N")]
    pub max_length: Option<usize>,

    /// Keep only candidates containing this text (case-insensitive)
    #[arg(long, value_name = "TEXT")]
    pub contains: Option<String>,

    /// Export format
    #[arg(long, value_enum)]
    pub format: Option<ExportFormat>,

    /// Output directory (files) or file (json, csv)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Include context and metadata in the export
    #[arg(long)]
    pub include_metadata: bool,

    /// Print statistics about the extracted code
    #[arg(long)]
    pub stats: bool,

    /// Log verbosity
    #[arg(long, value_enum, ignore_case = true)]
    pub log_level: Option<LogLevel>,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Config file (default: <config dir>/code-extractor/config.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Whether the input should be read from standard input.
    pub fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }

    /// Filter assembled from the filter flags.
    pub fn filter(&self) -> CodeFilter {
        let mut filter = CodeFilter::new();
        if let Some(language) = &self.language {
            filter = filter.language(language);
        }
        filter.source_type = self.source_type;
        filter.min_confidence = self.min_confidence;
        filter.max_confidence = self.max_confidence;
        filter.min_length = self.min_length;
        filter.max_length = self.max_length;
        filter.contains = self.contains.clone();
        filter.role = self.role.clone();
        filter
    }

    /// Apply pattern flags on top of the configured extraction settings.
    ///
    /// `--min-confidence` is applied after extraction by the filter, so the
    /// extractor threshold stays as configured.
    pub fn extraction_config(&self, base: ExtractionConfig) -> ExtractionConfig {
        match &self.patterns {
            Some(patterns) => base.with_patterns(patterns.iter().copied()),
            None => base,
        }
    }

    /// Effective log level: `--quiet`, then `--log-level`, then the config file.
    pub fn log_level(&self, configured: LogLevel) -> LogLevel {
        if self.quiet {
            LogLevel::Error
        } else {
            self.log_level.unwrap_or(configured)
        }
    }
}
