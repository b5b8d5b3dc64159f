//! Export round trips through every format.

use std::fs;

use code_extractor::export::files::MANIFEST_NAME;
use code_extractor::{
    export, CodeExtractor, ExportError, ExportFormat, ExtractedCode, Input, InputType,
};
use tempfile::TempDir;

use crate::helpers::load_fixture;

fn guide_codes() -> Vec<ExtractedCode> {
    CodeExtractor::default().extract(&Input::parse(load_fixture("guide.md")), InputType::Auto)
}

// ============================================================================
// JSON
// ============================================================================

#[test]
fn json_with_metadata_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("codes.json");
    let codes = guide_codes();

    export(&codes, ExportFormat::Json, &path, true).unwrap();

    let back: Vec<ExtractedCode> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(back.len(), codes.len());
    for (original, parsed) in codes.iter().zip(&back) {
        assert_eq!(parsed.content(), original.content());
        assert_eq!(parsed.language(), original.language());
        assert_eq!(parsed.extraction_method(), original.extraction_method());
        assert!((parsed.confidence() - original.confidence()).abs() < f64::EPSILON);
        assert_eq!(parsed.context(), original.context());
        assert_eq!(parsed.metadata(), original.metadata());
    }
}

#[test]
fn json_without_metadata_is_brief() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("codes.json");

    export(&guide_codes(), ExportFormat::Json, &path, false).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let first = value[0].as_object().unwrap();
    let mut keys: Vec<_> = first.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["content", "language"]);
}

#[test]
fn empty_json_export_is_an_empty_array() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.json");

    export(&[], ExportFormat::Json, &path, true).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value, serde_json::json!([]));
}

// ============================================================================
// CSV
// ============================================================================

#[test]
fn csv_preserves_commas_and_newlines() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("codes.csv");
    let text = "```python\nrow = [1, 2, 3]\nprint(\"a, b\")\n```";
    let codes = CodeExtractor::default().extract(&Input::text(text), InputType::Auto);
    assert_eq!(codes.len(), 1);

    export(&codes, ExportFormat::Csv, &path, false).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    let content_column = headers.iter().position(|h| h == "content").unwrap();
    let rows: Vec<_> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][content_column], "row = [1, 2, 3]\nprint(\"a, b\")");
}

#[test]
fn csv_rows_follow_extraction_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out/codes.csv");
    let codes = guide_codes();

    export(&codes, ExportFormat::Csv, &path, true).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.len(), 12);
    let rows: Vec<_> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), codes.len());
    for (row, code) in rows.iter().zip(&codes) {
        assert_eq!(&row[1], code.language());
        assert_eq!(&row[3], code.extraction_method().as_str());
        assert_eq!(row[4].parse::<f64>().unwrap(), code.confidence());
        let context: serde_json::Value = serde_json::from_str(&row[10]).unwrap();
        assert_eq!(context["line"], code.context().line);
    }
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn files_export_writes_one_file_per_candidate() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("blocks");

    export(&guide_codes(), ExportFormat::Files, &out, false).unwrap();

    let mut names: Vec<_> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "0001_bash_single_backtick.sh",
            "0002_python_triple_backtick.py",
            "0003_bash_fenced_tilde.sh",
            "0004_sql_indented_code.sql",
        ]
    );
    assert_eq!(
        fs::read_to_string(out.join("0003_bash_fenced_tilde.sh")).unwrap(),
        "python fetch.py --verbose"
    );
}

#[test]
fn files_export_manifest_lists_files() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("blocks");
    let codes = guide_codes();

    export(&codes, ExportFormat::Files, &out, true).unwrap();

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join(MANIFEST_NAME)).unwrap()).unwrap();
    let entries = manifest.as_array().unwrap();
    assert_eq!(entries.len(), codes.len());
    assert_eq!(entries[1]["file"], "0002_python_triple_backtick.py");
    assert_eq!(entries[1]["language"], "python");
    assert_eq!(entries[1]["metadata"]["pattern"], "triple_backtick");
}

#[test]
fn files_export_never_overwrites() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("blocks");
    let codes = guide_codes();

    export(&codes, ExportFormat::Files, &out, false).unwrap();
    let err = export(&codes, ExportFormat::Files, &out, false).unwrap_err();

    assert!(matches!(err, ExportError::Io { .. }));
}
