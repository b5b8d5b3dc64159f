//! Integration tests for code-extractor.

mod helpers;

mod cli_test;
mod export_test;
mod extract_test;
mod properties_test;
