//! CSV export.
//!
//! Quoting follows RFC 4180 via the `csv` crate, so commas, quotes and
//! newlines inside content survive a round trip through any CSV reader.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::ExportError;
use crate::extractor::ExtractedCode;

/// Columns always written, in order.
pub const COLUMNS: [&str; 10] = [
    "index",
    "language",
    "source_type",
    "extraction_method",
    "confidence",
    "content_length",
    "line",
    "message_index",
    "role",
    "content",
];

/// Extra JSON-valued columns written with metadata.
pub const METADATA_COLUMNS: [&str; 2] = ["context", "metadata"];

/// Write `codes` as CSV to any writer.
pub fn write_to<W: Write>(writer: W, codes: &[ExtractedCode], include_metadata: bool) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = COLUMNS.to_vec();
    if include_metadata {
        header.extend(METADATA_COLUMNS);
    }
    csv.write_record(&header)?;

    for (index, code) in codes.iter().enumerate() {
        let context = code.context();
        let mut row = vec![
            index.to_string(),
            code.language().to_string(),
            code.source_type().to_string(),
            code.extraction_method().to_string(),
            code.confidence().to_string(),
            code.char_len().to_string(),
            context.line.to_string(),
            context.message_index.map(|i| i.to_string()).unwrap_or_default(),
            context.role.clone().unwrap_or_default(),
            code.content().to_string(),
        ];
        if include_metadata {
            row.push(serde_json::to_string(context)?);
            row.push(serde_json::to_string(code.metadata())?);
        }
        csv.write_record(&row)?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub(super) fn write(codes: &[ExtractedCode], path: &Path, include_metadata: bool) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|e| ExportError::io(path, e))?;
    write_to(file, codes, include_metadata)
}
