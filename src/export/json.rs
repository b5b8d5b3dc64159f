//! Pretty-printed JSON array export.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::ExportError;
use crate::extractor::ExtractedCode;

/// Record written when metadata is excluded.
#[derive(Serialize)]
struct Brief<'a> {
    content: &'a str,
    language: &'a str,
}

/// Render `codes` as a JSON array.
pub fn to_string(codes: &[ExtractedCode], include_metadata: bool) -> Result<String, ExportError> {
    let json = if include_metadata {
        serde_json::to_string_pretty(codes)?
    } else {
        let brief: Vec<_> = codes
            .iter()
            .map(|code| Brief {
                content: code.content(),
                language: code.language(),
            })
            .collect();
        serde_json::to_string_pretty(&brief)?
    };
    Ok(json)
}

pub(super) fn write(codes: &[ExtractedCode], path: &Path, include_metadata: bool) -> Result<(), ExportError> {
    let json = to_string(codes, include_metadata)?;
    fs::write(path, json).map_err(|e| ExportError::io(path, e))
}
