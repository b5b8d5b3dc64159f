//! One file per candidate.
//!
//! Files are named `{seq:04}_{language}_{method}.{ext}` and created with
//! create-new semantics: an existing file is an error, never overwritten.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use deunicode::deunicode;
use serde::Serialize;
use tracing::debug;

use crate::error::ExportError;
use crate::extractor::ExtractedCode;

/// Name of the manifest written alongside the files.
pub const MANIFEST_NAME: &str = "index.json";

/// Windows reserved device names that cannot be used as filenames.
const WINDOWS_RESERVED: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Characters that are invalid in filenames on common filesystems.
const INVALID_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

const FALLBACK_NAME: &str = "unknown";

/// Longest language component kept in a filename.
const MAX_LANGUAGE_LENGTH: usize = 40;

/// Sanitizes a language name for use in filenames.
///
/// Transliterates to ASCII, turns whitespace into hyphens, drops characters
/// that are invalid on common filesystems, and falls back to `unknown`.
/// `+` and `#` are spelled out so `c++` and `c#` stay distinguishable.
pub fn sanitize(input: &str) -> String {
    let ascii = deunicode(input);

    let mut result = String::with_capacity(ascii.len());
    let mut last_was_hyphen = false;
    for c in ascii.chars() {
        if c.is_whitespace() || c == '-' {
            if !last_was_hyphen {
                result.push('-');
                last_was_hyphen = true;
            }
            continue;
        }
        last_was_hyphen = false;
        match c {
            '+' => result.push('p'),
            '#' => result.push_str("sharp"),
            c if INVALID_CHARS.contains(&c) => {}
            c if c.is_ascii_alphanumeric() || c == '_' || c == '.' => result.push(c),
            _ => {}
        }
    }

    let trimmed: String = result
        .trim_matches(|c| c == '.' || c == ' ' || c == '-')
        .chars()
        .take(MAX_LANGUAGE_LENGTH)
        .collect();
    let name = handle_reserved_name(&trimmed);
    if name.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        name
    }
}

/// Prefix Windows reserved names (`CON`, `CON.txt`) with `_`.
fn handle_reserved_name(name: &str) -> String {
    let base_name = name.split('.').next().unwrap_or(name);
    if WINDOWS_RESERVED.contains(&base_name.to_uppercase().as_str()) {
        format!("_{}", name)
    } else {
        name.to_string()
    }
}

/// File extension for a canonical language name.
pub fn extension(language: &str) -> &'static str {
    match language {
        "python" => "py",
        "typescript" => "ts",
        "javascript" => "js",
        "java" => "java",
        "csharp" => "cs",
        "go" => "go",
        "rust" => "rs",
        "cpp" => "cpp",
        "c" => "c",
        "kotlin" => "kt",
        "swift" => "swift",
        "scala" => "scala",
        "php" => "php",
        "ruby" => "rb",
        "perl" => "pl",
        "lua" => "lua",
        "r" => "r",
        "matlab" => "m",
        "sql" => "sql",
        "html" => "html",
        "xml" => "xml",
        "svg" => "svg",
        "css" => "css",
        "json" => "json",
        "yaml" => "yaml",
        "toml" => "toml",
        "dockerfile" => "dockerfile",
        "makefile" => "mk",
        "bash" => "sh",
        "powershell" => "ps1",
        _ => "txt",
    }
}

/// Filename for the candidate at 1-based position `seq`.
pub fn file_name(seq: usize, code: &ExtractedCode) -> String {
    format!(
        "{:04}_{}_{}.{}",
        seq,
        sanitize(code.language()),
        code.extraction_method(),
        extension(code.language())
    )
}

#[derive(Serialize)]
struct ManifestEntry<'a> {
    file: String,
    #[serde(flatten)]
    code: &'a ExtractedCode,
}

fn create_new(path: &Path) -> Result<fs::File, ExportError> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| ExportError::io(path, e))
}

pub(super) fn write(
    codes: &[ExtractedCode],
    dir: &Path,
    include_metadata: bool,
) -> Result<(), ExportError> {
    fs::create_dir_all(dir).map_err(|e| ExportError::io(dir, e))?;

    // Claim the manifest before any candidate file is written.
    let manifest_path = dir.join(MANIFEST_NAME);
    let manifest_file = if include_metadata {
        Some(create_new(&manifest_path)?)
    } else {
        None
    };

    let mut manifest = Vec::with_capacity(codes.len());
    for (i, code) in codes.iter().enumerate() {
        let name = file_name(i + 1, code);
        let path = dir.join(&name);
        let mut file = create_new(&path)?;
        file.write_all(code.content().as_bytes())
            .map_err(|e| ExportError::io(&path, e))?;
        debug!(file = %path.display(), "Wrote candidate");
        manifest.push(ManifestEntry { file: name, code });
    }

    if let Some(mut file) = manifest_file {
        let json = serde_json::to_string_pretty(&manifest)?;
        file.write_all(json.as_bytes())
            .map_err(|e| ExportError::io(&manifest_path, e))?;
    }
    Ok(())
}
