//! Integration tests for the command-line interface.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

use crate::helpers::{fixture_path, run_cli, run_cli_with_stdin};

// ============================================================================
// Help and Version
// ============================================================================

#[test]
fn help_exits_0_and_lists_flags() {
    let (stdout, _stderr, exit_code) = run_cli(&["--help"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("<INPUT>"));
    for flag in [
        "--input-type",
        "--patterns",
        "--min-confidence",
        "--format",
        "--include-metadata",
        "--stats",
        "--log-level",
        "--config",
    ] {
        assert!(stdout.contains(flag), "missing {flag} in help");
    }
}

#[test]
fn version_includes_package_version() {
    cargo_bin_cmd!("code-extractor")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// ============================================================================
// Usage and Configuration Errors (exit 2)
// ============================================================================

#[test]
fn missing_input_is_a_usage_error() {
    let (_stdout, stderr, exit_code) = run_cli(&[]);

    assert_eq!(exit_code, 2);
    assert!(stderr.contains("<INPUT>"));
}

#[test]
fn unknown_pattern_exits_2() {
    let input = fixture_path("guide.md");
    let (_stdout, stderr, exit_code) =
        run_cli(&[input.to_str().unwrap(), "--patterns", "triple_backtick,bogus"]);

    assert_eq!(exit_code, 2);
    assert!(stderr.contains("bogus"));
}

#[test]
fn inverted_length_range_exits_2() {
    let input = fixture_path("guide.md");
    let (_stdout, stderr, exit_code) = run_cli(&[
        input.to_str().unwrap(),
        "--min-length",
        "10",
        "--max-length",
        "5",
    ]);

    assert_eq!(exit_code, 2);
    assert!(stderr.contains("min_length"));
}

#[test]
fn confidence_out_of_range_exits_2() {
    let input = fixture_path("guide.md");
    let (_stdout, _stderr, exit_code) =
        run_cli(&[input.to_str().unwrap(), "--min-confidence", "1.5"]);

    assert_eq!(exit_code, 2);
}

#[test]
fn invalid_config_file_exits_2() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "[extraction\n").unwrap();
    let input = fixture_path("guide.md");

    let (_stdout, stderr, exit_code) = run_cli(&[
        input.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);

    assert_eq!(exit_code, 2);
    assert!(stderr.contains("config.toml"));
}

// ============================================================================
// Runtime Failures (exit 1)
// ============================================================================

#[test]
fn missing_input_file_exits_1() {
    let (_stdout, stderr, exit_code) = run_cli(&["/definitely/not/here.md"]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains("Failed to read input"));
}

#[test]
fn export_into_existing_files_exits_1() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let input = fixture_path("guide.md");
    let args = [
        input.to_str().unwrap(),
        "--format",
        "files",
        "--output",
        out.to_str().unwrap(),
    ];

    assert_eq!(run_cli(&args).2, 0);
    let (_stdout, stderr, exit_code) = run_cli(&args);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains("Failed to export"));
}

// ============================================================================
// Successful Runs
// ============================================================================

#[test]
fn exports_json_from_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("codes.json");
    let input = fixture_path("guide.md");

    let (stdout, _stderr, exit_code) = run_cli(&[
        input.to_str().unwrap(),
        "--format",
        "json",
        "--output",
        out.to_str().unwrap(),
    ]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("Exported 4 code blocks"));
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let languages: Vec<_> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["language"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(languages, vec!["bash", "python", "bash", "sql"]);
}

#[test]
fn reads_stdin_with_dash() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("codes.csv");

    let (_stdout, _stderr, exit_code) = run_cli_with_stdin(
        &["-", "--format", "csv", "--output", out.to_str().unwrap()],
        Some("Run `cargo test --all` now."),
    );

    assert_eq!(exit_code, 0);
    let mut reader = csv::Reader::from_path(&out).unwrap();
    let rows: Vec<_> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][9], "cargo test --all");
}

#[test]
fn filters_apply_before_export() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("codes.json");
    let input = fixture_path("guide.md");

    let (_stdout, _stderr, exit_code) = run_cli(&[
        input.to_str().unwrap(),
        "--format",
        "json",
        "--output",
        out.to_str().unwrap(),
        "--language",
        "py",
    ]);

    assert_eq!(exit_code, 0);
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 1);
    assert!(value[0]["content"].as_str().unwrap().contains("import requests"));
}

#[test]
fn no_matches_exports_nothing_and_exits_0() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("codes.json");

    let (_stdout, stderr, exit_code) = run_cli_with_stdin(
        &["-", "--format", "json", "--output", out.to_str().unwrap()],
        Some("Nothing to see here."),
    );

    assert_eq!(exit_code, 0);
    assert!(!out.exists());
    assert!(stderr.contains("No code blocks found"));
}

#[test]
fn quiet_suppresses_warnings() {
    let (_stdout, stderr, exit_code) =
        run_cli_with_stdin(&["-", "--quiet"], Some("Nothing to see here."));

    assert_eq!(exit_code, 0);
    assert!(!stderr.contains("No code blocks found"));
}

#[test]
fn stats_are_printed() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("codes.json");
    let input = fixture_path("guide.md");

    cargo_bin_cmd!("code-extractor")
        .arg(&input)
        .args(["--format", "json", "--stats", "--output"])
        .arg(&out)
        .env("XDG_CONFIG_HOME", dir.path())
        .env("HOME", dir.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Total code blocks: 4")
                .and(predicate::str::contains("By language"))
                .and(predicate::str::contains("sql")),
        );
}

#[test]
fn config_file_supplies_defaults() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("from-config.csv");
    let config = dir.path().join("config.toml");
    fs::write(
        &config,
        format!(
            "[extraction]\npatterns = [\"triple_backtick\"]\n\n[export]\nformat = \"csv\"\noutput = {:?}\n",
            out.to_str().unwrap()
        ),
    )
    .unwrap();
    let input = fixture_path("guide.md");

    let (_stdout, _stderr, exit_code) = run_cli(&[
        input.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);

    assert_eq!(exit_code, 0);
    let mut reader = csv::Reader::from_path(&out).unwrap();
    let rows: Vec<_> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][3], "triple_backtick");
}
