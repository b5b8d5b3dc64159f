//! Conjunctive filtering of extraction results.

use crate::error::ConfigError;
use crate::extractor::language::normalize_tag;
use crate::extractor::{ExtractedCode, ExtractionMethod, SourceType};

/// Predicates over [`ExtractedCode`]. Unset fields match everything; set
/// fields must all match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeFilter {
    pub language: Option<String>,
    pub source_type: Option<SourceType>,
    pub extraction_method: Option<ExtractionMethod>,
    pub min_confidence: Option<f64>,
    pub max_confidence: Option<f64>,
    /// Minimum content length in characters
    pub min_length: Option<usize>,
    /// Maximum content length in characters
    pub max_length: Option<usize>,
    /// Case-insensitive substring of the content
    pub contains: Option<String>,
    /// Case-insensitive conversation role
    pub role: Option<String>,
}

impl CodeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match a language, written as any alias (`js`, `py`, ...). A name that
    /// does not normalize is kept as written and matches no candidate.
    pub fn language(mut self, language: impl AsRef<str>) -> Self {
        let language = language.as_ref();
        self.language =
            Some(normalize_tag(language).unwrap_or_else(|| language.trim().to_lowercase()));
        self
    }

    pub fn source_type(mut self, source_type: SourceType) -> Self {
        self.source_type = Some(source_type);
        self
    }

    pub fn extraction_method(mut self, method: ExtractionMethod) -> Self {
        self.extraction_method = Some(method);
        self
    }

    pub fn min_confidence(mut self, value: f64) -> Self {
        self.min_confidence = Some(value);
        self
    }

    pub fn max_confidence(mut self, value: f64) -> Self {
        self.max_confidence = Some(value);
        self
    }

    pub fn min_length(mut self, chars: usize) -> Self {
        self.min_length = Some(chars);
        self
    }

    pub fn max_length(mut self, chars: usize) -> Self {
        self.max_length = Some(chars);
        self
    }

    pub fn contains(mut self, needle: impl Into<String>) -> Self {
        self.contains = Some(needle.into());
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Whether no predicate is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Reject contradictory or out-of-range bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("min_confidence", self.min_confidence),
            ("max_confidence", self.max_confidence),
        ] {
            if let Some(value) = value {
                if !(0.0..=1.0).contains(&value) {
                    return Err(ConfigError::ConfidenceOutOfBounds { name, value });
                }
            }
        }
        if let (Some(min), Some(max)) = (self.min_confidence, self.max_confidence) {
            if min > max {
                return Err(ConfigError::ConfidenceRange { min, max });
            }
        }
        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(ConfigError::LengthRange { min, max });
            }
        }
        Ok(())
    }

    /// Whether `code` satisfies every set predicate.
    pub fn matches(&self, code: &ExtractedCode) -> bool {
        if let Some(language) = &self.language {
            if code.language() != language {
                return false;
            }
        }
        if self.source_type.is_some_and(|t| t != code.source_type()) {
            return false;
        }
        if self
            .extraction_method
            .is_some_and(|m| m != code.extraction_method())
        {
            return false;
        }
        if self.min_confidence.is_some_and(|min| code.confidence() < min) {
            return false;
        }
        if self.max_confidence.is_some_and(|max| code.confidence() > max) {
            return false;
        }
        let length = code.char_len();
        if self.min_length.is_some_and(|min| length < min) {
            return false;
        }
        if self.max_length.is_some_and(|max| length > max) {
            return false;
        }
        if let Some(needle) = &self.contains {
            if !code
                .content()
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        if let Some(role) = &self.role {
            match code.role() {
                Some(actual) if actual.eq_ignore_ascii_case(role) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Keep the candidates matching `filter`, preserving order.
pub fn filter(codes: &[ExtractedCode], filter: &CodeFilter) -> Result<Vec<ExtractedCode>, ConfigError> {
    filter.validate()?;
    Ok(codes
        .iter()
        .filter(|code| filter.matches(code))
        .cloned()
        .collect())
}
