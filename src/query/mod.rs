//! Querying extraction results: filtering and statistics.

mod filter;
mod stats;

pub use filter::{filter, CodeFilter};
pub use stats::{get_statistics, ConfidenceStats, LengthStats, Statistics, HIGH_CONFIDENCE, LOW_CONFIDENCE};
