//! End-to-end tests for the `golden` binary
//!
//! Each test lays out a corpus in a temporary working directory and runs the built binary there.

#![cfg(unix)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn golden(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_golden"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run golden")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn test_examples_pass_and_skip() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("examples/arith/arith.va"), "echo 20\n");
    write(&dir.path().join("examples/arith/output.txt"), "20\n");
    write(&dir.path().join("examples/pending/pending.va"), "echo 1\n");

    let output = golden(dir.path(), &["examples", "--interpreter", "sh"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "Passed : 1\nSkipped: 1\npending\n");
}

#[test]
fn test_mismatch_keeps_exit_status_zero() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("examples/arith/arith.va"), "echo 19\n");
    write(&dir.path().join("examples/arith/output.txt"), "20\n");

    let output = golden(dir.path(), &["examples", "--interpreter", "sh"]);

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "examples/arith/arith.va\nOutput doesn't match expected.\nExpected:\n20\n\nActual:\n19\n\nPassed : 0\nSkipped: 0\n"
    );
}

#[test]
fn test_fail_on_mismatch_flag() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("examples/arith/arith.va"), "echo 19\n");
    write(&dir.path().join("examples/arith/output.txt"), "20\n");

    let output = golden(dir.path(), &["examples", "--interpreter", "sh", "--fail-on-mismatch"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).ends_with("Passed : 0\nSkipped: 0\n"));
}

#[test]
fn test_fatal_error_exits_nonzero_without_summary() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("examples/arith/arith.va"), "echo boom >&2\n");
    write(&dir.path().join("examples/arith/output.txt"), "20\n");

    let output = golden(dir.path(), &["examples", "--interpreter", "sh"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "");
    assert!(stderr(&output).starts_with("examples/arith/arith.va\nboom"));
}

#[test]
fn test_fatal_child_stderr_is_printed_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("examples/arith/arith.va"), "printf 'boom\\n\\n  at line 3\\n\\n' >&2\n");
    write(&dir.path().join("examples/arith/output.txt"), "20\n");

    let output = golden(dir.path(), &["examples", "--interpreter", "sh"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr(&output), "examples/arith/arith.va\nboom\n\n  at line 3\n\n");
}

#[test]
fn test_missing_examples_dir_is_fatal() {
    let dir = tempfile::tempdir().unwrap();

    let output = golden(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("Error reading directory examples"));
}

#[test]
fn test_compiled_mode_reports_compile_failure() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("test/bad.va"), "echo 'unexpected token' >&2\nexit 2\n");
    write(&dir.path().join("test_output/bad.txt"), "20\n");

    let output = golden(dir.path(), &["compiled", "--compiler", "sh", "--runtime", "sh"]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.starts_with("test/bad.va\n"));
    assert!(err.contains("unexpected token"));
    assert!(!dir.path().join("a.mjs").exists());
}

#[test]
fn test_compiled_mode_runs_artifact() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("test/arith.va"), "echo 'echo 20' > a.mjs\n");
    write(&dir.path().join("test_output/arith.txt"), "20\n");

    let output = golden(dir.path(), &["compiled", "--compiler", "sh", "--runtime", "sh"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "Passed : 1\nSkipped: 0\n");
}

#[test]
fn test_json_report() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("examples/arith/arith.va"), "echo 19\n");
    write(&dir.path().join("examples/arith/output.txt"), "20\n");
    write(&dir.path().join("examples/fib/fib.va"), "echo 8\n");

    let output = golden(dir.path(), &["--format", "json", "examples", "--interpreter", "sh"]);

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["passed"], 0);
    assert_eq!(report["skipped"], serde_json::json!(["fib"]));
    assert_eq!(report["mismatched"][0]["case"], "arith");
    assert_eq!(report["mismatched"][0]["actual"], "19\n");
}
