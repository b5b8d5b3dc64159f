//! Generic code extractor.
//!
//! Finds code blocks inside plain text, chat transcripts (JSON), HTML, XML
//! and Markdown, resolves their language, scores how reliable each candidate
//! is, and filters, summarizes or exports the result.
//!
//! ```no_run
//! use code_extractor::{export, filter, CodeExtractor, CodeFilter, ExportFormat, Input, InputType};
//!
//! let extractor = CodeExtractor::default();
//! let codes = extractor.extract(&Input::parse("```py\nprint(1)\n```"), InputType::Auto);
//! let python = filter(&codes, &CodeFilter::new().language("py")).unwrap();
//! export(&python, ExportFormat::Json, "out.json".as_ref(), true).unwrap();
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod extractor;
pub mod logging;
pub mod query;

pub use config::Config;
pub use error::{ConfigError, ExportError, InputError, PatternError};
pub use export::{export, ExportFormat};
pub use extractor::{
    extract, CodeContext, CodeExtractor, CodeMetadata, ExtractedCode, ExtractionConfig,
    ExtractionMethod, Input, InputType, SourceType,
};
pub use query::{filter, get_statistics, CodeFilter, Statistics};
