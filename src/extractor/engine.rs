//! Extraction pipeline orchestration.
//!
//! [`CodeExtractor`] is configured once and holds no mutable state, so a
//! single instance can serve any number of `extract` calls, from any number
//! of threads.

use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::{debug, warn};

use super::config::ExtractionConfig;
use super::confidence;
use super::input::{normalize, Input, InputType, Segment};
use super::language::LanguageClassifier;
use super::scanner::{self, RawMatch};
use super::spans::ClaimedSpans;
use super::types::{CodeContext, CodeMetadata, ExtractedCode, ExtractionMethod, SourceType};
use crate::error::ConfigError;

/// Finds, classifies and scores code blocks.
#[derive(Debug, Clone, Default)]
pub struct CodeExtractor {
    config: ExtractionConfig,
}

impl CodeExtractor {
    /// Create an extractor after validating `config`.
    pub fn new(config: ExtractionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract every candidate from one input, in segment then offset order.
    pub fn extract(&self, input: &Input, input_type: InputType) -> Vec<ExtractedCode> {
        let normalized = normalize(input, input_type);
        debug!(
            source_type = %normalized.source_type,
            segments = normalized.segments.len(),
            "Normalized input"
        );
        let codes: Vec<_> = normalized
            .segments
            .iter()
            .enumerate()
            .flat_map(|(index, segment)| {
                self.extract_segment(index, segment, normalized.source_type)
            })
            .collect();
        debug!(candidates = codes.len(), "Extraction finished");
        codes
    }

    /// Extract from several documents in parallel.
    ///
    /// Results are concatenated in input order and tagged with their
    /// `document_index`.
    pub fn extract_many(&self, inputs: &[Input], input_type: InputType) -> Vec<ExtractedCode> {
        inputs
            .par_iter()
            .enumerate()
            .map(|(document, input)| {
                self.extract(input, input_type)
                    .into_iter()
                    .map(|code| code.with_document_index(document))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }

    fn extract_segment(
        &self,
        segment_index: usize,
        segment: &Segment,
        source_type: SourceType,
    ) -> Vec<ExtractedCode> {
        let text = segment.text.as_str();
        let mut claimed = ClaimedSpans::new();
        let mut accepted: Vec<(ExtractionMethod, RawMatch)> = Vec::new();

        for method in self.config.scan_order() {
            match scanner::scan(method, text, &claimed, self.config.max_matches_per_pattern) {
                Ok(found) => {
                    let before = accepted.len();
                    for candidate in found {
                        if claimed.claim(candidate.start, candidate.end) {
                            accepted.push((method, candidate));
                        }
                    }
                    debug!(
                        segment = segment_index,
                        %method,
                        matches = accepted.len() - before,
                        "Scanned pattern"
                    );
                }
                Err(e) => warn!(segment = segment_index, "{}; skipping pattern", e),
            }
        }

        accepted.sort_by_key(|(_, candidate)| candidate.start);

        let mut per_method: BTreeMap<ExtractionMethod, usize> = BTreeMap::new();
        accepted
            .into_iter()
            .filter_map(|(method, candidate)| {
                let counter = per_method.entry(method).or_default();
                let match_index = *counter;
                *counter += 1;
                self.build(segment_index, segment, source_type, method, match_index, candidate)
            })
            .collect()
    }

    /// Classify and score one accepted candidate.
    ///
    /// Returns `None` when it falls below the confidence threshold.
    fn build(
        &self,
        segment_index: usize,
        segment: &Segment,
        source_type: SourceType,
        method: ExtractionMethod,
        match_index: usize,
        candidate: RawMatch,
    ) -> Option<ExtractedCode> {
        let RawMatch {
            start,
            end,
            content,
            hint,
            explicit,
            implied,
        } = candidate;

        let mut classification = LanguageClassifier::shared()
            .classify(&content, explicit.as_deref().or(implied));
        if explicit.is_none() {
            classification.explicit = false;
        }

        let content_length = content.chars().count();
        let confidence = confidence::score(method, content_length, &classification);
        if confidence < self.config.min_confidence {
            return None;
        }

        let context = CodeContext {
            line: line_of(&segment.text, start),
            segment_index,
            message_index: segment.context.message_index,
            role: segment.context.role.clone(),
            block_index: segment.context.block_index,
            timestamp: segment.context.timestamp.clone(),
            document_index: None,
        };
        let metadata = CodeMetadata {
            start,
            end,
            pattern: method.to_string(),
            match_index,
            language_hint: hint,
            alternate_languages: classification.alternates,
            signals: classification.signals,
            segment_length: segment.text.chars().count(),
            content_length,
        };
        Some(ExtractedCode::new(
            content,
            classification.language,
            source_type,
            method,
            confidence,
            context,
            metadata,
        ))
    }
}

/// 1-based line number of byte offset `pos`.
fn line_of(text: &str, pos: usize) -> usize {
    text.as_bytes()[..pos].iter().filter(|&&b| b == b'\n').count() + 1
}

/// One-shot extraction with an optional pattern subset and threshold.
pub fn extract(
    input: &Input,
    input_type: InputType,
    patterns: Option<&[ExtractionMethod]>,
    min_confidence: f64,
) -> Result<Vec<ExtractedCode>, ConfigError> {
    let mut config = ExtractionConfig::default().with_min_confidence(min_confidence);
    if let Some(patterns) = patterns {
        config = config.with_patterns(patterns.iter().copied());
    }
    Ok(CodeExtractor::new(config)?.extract(input, input_type))
}
