//! Confidence scoring.
//!
//! A pure function of the extraction method, the content length and the
//! classification result. Fenced and tagged constructs start higher than
//! bare indentation or inline backticks.

use super::language::{Classification, STRONG_SIGNALS};
use super::types::ExtractionMethod;

const EXPLICIT_TAG_BONUS: f64 = 0.05;
const SHORT_CONTENT_PENALTY: f64 = 0.1;
const STRONG_SIGNAL_BONUS: f64 = 0.05;

/// Content shorter than this (in chars) is penalized.
const SHORT_CONTENT: usize = 10;
/// Content at least this long (in chars) can earn the signal bonus.
const LONG_CONTENT: usize = 50;

/// Starting score for each method.
pub fn base_score(method: ExtractionMethod) -> f64 {
    match method {
        ExtractionMethod::TripleBacktick
        | ExtractionMethod::FencedTilde
        | ExtractionMethod::ScriptTag
        | ExtractionMethod::StyleTag => 0.9,
        ExtractionMethod::HtmlPre
        | ExtractionMethod::HtmlCode
        | ExtractionMethod::Heredoc
        | ExtractionMethod::LanguageComment => 0.8,
        ExtractionMethod::IndentedCode => 0.7,
        ExtractionMethod::SingleBacktick => 0.6,
    }
}

/// Score a candidate of `char_len` characters.
///
/// The result is clamped to `[0, 1]` and rounded to three decimals.
pub fn score(method: ExtractionMethod, char_len: usize, classification: &Classification) -> f64 {
    let mut score = base_score(method);
    if classification.explicit && classification.recognized {
        score += EXPLICIT_TAG_BONUS;
    }
    if char_len < SHORT_CONTENT {
        score -= SHORT_CONTENT_PENALTY;
    }
    if char_len >= LONG_CONTENT && classification.signals >= STRONG_SIGNALS {
        score += STRONG_SIGNAL_BONUS;
    }
    round3(score.clamp(0.0, 1.0))
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
