//! Command handlers for the binary.

pub mod extract;
pub mod stats;
