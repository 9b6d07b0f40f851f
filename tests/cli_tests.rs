//! End-to-end tests for the `pathvet` binary.
//!
//! Run with:
//! ```bash
//! cargo test --test cli_tests
//! ```

use std::io::Write;
use std::process::{Command, Output};

fn pathvet(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pathvet"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run pathvet")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_check_name_ok() {
    let output = pathvet(&["check-name", "--platform", "windows", "report.pdf"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "ok: report.pdf");
}

#[test]
fn test_check_name_failure_exits_nonzero() {
    let output = pathvet(&["check-name", "--platform", "windows", "CON"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("PV1002"), "{stderr}");
}

#[test]
fn test_check_path_json() {
    let output = pathvet(&["check-path", "--platform", "linux", "--json", r"C:\Users", "/tmp"]);
    assert!(!output.status.success());

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json[0]["error"]["reason"], "MALFORMED_ABSOLUTE_PATH");
    assert_eq!(json[1]["valid"], true);
}

#[test]
fn test_sanitize_name() {
    let output = pathvet(&["sanitize-name", "--platform", "windows", "CON", "a?b"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "CON_\nab\n");
}

#[test]
fn test_sanitize_path_with_profile() {
    let mut profile = tempfile::NamedTempFile::new().unwrap();
    writeln!(profile, "platform = \"universal\"\n\n[sanitize]\nreplacement_text = \"_\"").unwrap();

    let config = profile.path().to_str().unwrap();
    let output = pathvet(&["sanitize-path", "--config", config, "dir/a:b"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "dir/a_b");
}
