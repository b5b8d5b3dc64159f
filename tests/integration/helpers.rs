//! Shared helpers for integration tests.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Directory holding the test fixtures.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Path to a named fixture.
pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Contents of a named fixture.
pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", name, e))
}

/// Run the code-extractor binary and capture (stdout, stderr, exit code).
pub fn run_cli(args: &[&str]) -> (String, String, i32) {
    run_cli_with_stdin(args, None)
}

/// Run the binary, optionally feeding `stdin`.
pub fn run_cli_with_stdin(args: &[&str], stdin: Option<&str>) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_code-extractor"))
        .args(args)
        // Keep the user's config file out of the way
        .env("XDG_CONFIG_HOME", std::env::temp_dir().join("code-extractor-tests-none"))
        .env("HOME", std::env::temp_dir().join("code-extractor-tests-none"))
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute code-extractor");

    if let Some(input) = stdin {
        child
            .stdin
            .take()
            .expect("stdin is piped")
            .write_all(input.as_bytes())
            .expect("Failed to write stdin");
    }

    let output = child.wait_with_output().expect("Failed to wait for code-extractor");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}
