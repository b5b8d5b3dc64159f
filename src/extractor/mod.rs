//! Code extraction pipeline.
//!
//! Input flows strictly through four stages:
//!
//! - [`input`] - reduce raw input to ordered `(text, context)` segments
//! - [`scanner`] - run the patterns in priority order over each segment,
//!   tracking claimed spans in [`spans`] so candidates never overlap
//! - [`language`] - resolve the language of each candidate
//! - [`confidence`] - score each candidate
//!
//! [`CodeExtractor`] drives the stages for one or many documents.

pub mod confidence;
mod config;
mod engine;
pub mod input;
pub mod language;
pub mod scanner;
pub mod spans;
mod types;

pub use config::{parse_patterns, ExtractionConfig, DEFAULT_MAX_MATCHES};
pub use engine::{extract, CodeExtractor};
pub use input::{Input, InputType};
pub use language::{Classification, LanguageClassifier};
pub use types::{CodeContext, CodeMetadata, ExtractedCode, ExtractionMethod, SourceType};

#[cfg(test)]
pub(crate) use types::sample;
