//! Extract command handler: read, extract, filter, report, export.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use code_extractor::cli::Cli;
use code_extractor::{
    export, filter, logging, CodeExtractor, Config, ExportFormat, Input, InputError, InputType,
};

use super::stats;

/// Run the extraction pipeline as described by `cli`.
///
/// Configuration problems surface as [`code_extractor::ConfigError`] before
/// any input is read.
#[cfg(not(tarpaulin_include))]
pub fn handle(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    logging::init(cli.log_level(config.logging.level));

    let code_filter = cli.filter();
    code_filter.validate()?;
    let extractor = CodeExtractor::new(cli.extraction_config(config.extraction.clone()))?;

    let raw = read_input(&cli.input)?;
    let input = match cli.input_type {
        InputType::Auto => Input::parse(raw),
        _ => Input::text(raw),
    };

    let codes = extractor.extract(&input, cli.input_type);
    let codes = filter(&codes, &code_filter)?;
    info!(count = codes.len(), "Extracted code blocks");

    if cli.stats {
        stats::print(&codes);
    }

    if codes.is_empty() {
        warn!("No code blocks found; nothing exported");
        return Ok(());
    }

    let format = cli.format.unwrap_or(config.export.format);
    let output = cli
        .output
        .clone()
        .or_else(|| config.export.output.clone())
        .unwrap_or_else(|| format.default_output().into());
    let include_metadata = cli.include_metadata || config.export.include_metadata;

    export(&codes, format, &output, include_metadata)
        .with_context(|| format!("Failed to export to {}", output.display()))?;
    println!("{}", summary(codes.len(), format, &output));
    Ok(())
}

/// Read the input file, or standard input for `-`.
///
/// Invalid UTF-8 is logged and decoded lossily.
pub fn read_input(path: &Path) -> Result<String> {
    let bytes = if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read standard input")?;
        buf
    } else {
        fs::read(path).with_context(|| format!("Failed to read input {}", path.display()))?
    };
    Ok(decode(bytes))
}

fn decode(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| {
        let offset = e.utf8_error().valid_up_to();
        warn!("{}; decoding lossily", InputError::InvalidUtf8 { offset });
        String::from_utf8_lossy(e.as_bytes()).into_owned()
    })
}

fn summary(count: usize, format: ExportFormat, output: &Path) -> String {
    let noun = if count == 1 { "code block" } else { "code blocks" };
    format!("Exported {} {} as {} to {}", count, noun, format, output.display())
}
