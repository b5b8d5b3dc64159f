//! Configuration for the extraction pipeline.

use serde::{Deserialize, Serialize};

use super::types::ExtractionMethod;
use crate::error::ConfigError;

/// Default per-segment match budget for a single pattern.
pub const DEFAULT_MAX_MATCHES: usize = 10_000;

/// Configuration for the extraction pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Enabled patterns. Order is irrelevant, scanning always follows
    /// [`ExtractionMethod::ALL`].
    pub patterns: Vec<ExtractionMethod>,
    /// Candidates scoring below this are dropped during extraction
    pub min_confidence: f64,
    /// Maximum candidates one pattern may produce per segment
    pub max_matches_per_pattern: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            patterns: ExtractionMethod::ALL.to_vec(),
            min_confidence: 0.0,
            max_matches_per_pattern: DEFAULT_MAX_MATCHES,
        }
    }
}

impl ExtractionConfig {
    pub fn with_patterns(mut self, patterns: impl IntoIterator<Item = ExtractionMethod>) -> Self {
        self.patterns = patterns.into_iter().collect();
        self
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn with_max_matches(mut self, max_matches_per_pattern: usize) -> Self {
        self.max_matches_per_pattern = max_matches_per_pattern;
        self
    }

    /// Whether `method` is enabled.
    pub fn enables(&self, method: ExtractionMethod) -> bool {
        self.patterns.contains(&method)
    }

    /// Enabled patterns in scan priority order, without duplicates.
    pub fn scan_order(&self) -> impl Iterator<Item = ExtractionMethod> + '_ {
        ExtractionMethod::ALL
            .into_iter()
            .filter(|m| self.enables(*m))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.patterns.is_empty() {
            return Err(ConfigError::NoPatterns);
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::ConfidenceOutOfBounds {
                name: "min_confidence",
                value: self.min_confidence,
            });
        }
        if self.max_matches_per_pattern == 0 {
            return Err(ConfigError::ZeroMatchLimit);
        }
        Ok(())
    }
}

/// Parse a comma-separated pattern list such as `triple_backtick,heredoc`.
pub fn parse_patterns(list: &str) -> Result<Vec<ExtractionMethod>, ConfigError> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::parse)
        .collect()
}
