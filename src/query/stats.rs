//! Summary statistics over extraction results.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::extractor::ExtractedCode;

/// Candidates at or above this are high confidence.
pub const HIGH_CONFIDENCE: f64 = 0.9;
/// Candidates below this are low confidence.
pub const LOW_CONFIDENCE: f64 = 0.7;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfidenceStats {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

/// Content lengths in characters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LengthStats {
    pub min: usize,
    pub max: usize,
    pub avg: f64,
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub total: usize,
    pub by_language: BTreeMap<String, usize>,
    pub by_method: BTreeMap<String, usize>,
    pub by_source_type: BTreeMap<String, usize>,
    pub confidence_stats: ConfidenceStats,
    pub content_length: LengthStats,
    pub high_confidence: usize,
    pub medium_confidence: usize,
    pub low_confidence: usize,
}

/// Aggregate `codes`. Empty input yields zeros and empty maps.
pub fn get_statistics(codes: &[ExtractedCode]) -> Statistics {
    if codes.is_empty() {
        return Statistics::default();
    }

    let mut stats = Statistics {
        total: codes.len(),
        confidence_stats: ConfidenceStats {
            avg: 0.0,
            min: f64::MAX,
            max: f64::MIN,
        },
        content_length: LengthStats {
            min: usize::MAX,
            ..LengthStats::default()
        },
        ..Statistics::default()
    };

    let mut confidence_sum = 0.0;
    for code in codes {
        *stats.by_language.entry(code.language().to_string()).or_default() += 1;
        *stats
            .by_method
            .entry(code.extraction_method().to_string())
            .or_default() += 1;
        *stats
            .by_source_type
            .entry(code.source_type().to_string())
            .or_default() += 1;

        let confidence = code.confidence();
        confidence_sum += confidence;
        stats.confidence_stats.min = stats.confidence_stats.min.min(confidence);
        stats.confidence_stats.max = stats.confidence_stats.max.max(confidence);
        if confidence >= HIGH_CONFIDENCE {
            stats.high_confidence += 1;
        } else if confidence >= LOW_CONFIDENCE {
            stats.medium_confidence += 1;
        } else {
            stats.low_confidence += 1;
        }

        let length = code.char_len();
        stats.content_length.total += length;
        stats.content_length.min = stats.content_length.min.min(length);
        stats.content_length.max = stats.content_length.max.max(length);
    }

    let count = codes.len() as f64;
    stats.confidence_stats.avg = confidence_sum / count;
    stats.content_length.avg = stats.content_length.total as f64 / count;
    stats
}
