//! Harness-level abort signal
//!
//! Every variant here aborts the whole run. Output mismatches are *not* errors; they travel as
//! [`CaseOutcome::Mismatch`](super::compare::CaseOutcome::Mismatch) and the run continues.
//!
//! The `Display` text of each variant is the fatal diagnostic printed before the process exits, so
//! it always leads with the offending path.

use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors that abort a harness run.
#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    #[error("Error reading directory {}: {source}", root.display())]
    #[diagnostic(code(golden::discovery), help("discovery roots are resolved relative to the working directory"))]
    Discovery {
        root: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Directory entry name contains invalid Unicode: {}", path.display())]
    #[diagnostic(code(golden::discovery))]
    InvalidName { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    #[diagnostic(code(golden::fixture))]
    FixtureRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}\nFailed to run {program}: {source}", path.display())]
    #[diagnostic(code(golden::spawn), help("build the binary under test first, or point the harness at it with a flag"))]
    Spawn {
        path: PathBuf,
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{}\nFailed during program execution: {source}", path.display())]
    #[diagnostic(code(golden::io))]
    Communicate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}\n{stream} output not valid UTF-8", path.display())]
    #[diagnostic(code(golden::child))]
    InvalidUtf8 { path: PathBuf, stream: &'static str },

    #[error("{}\n{}", path.display(), stderr)]
    #[diagnostic(code(golden::child))]
    ChildStderr { path: PathBuf, stderr: String },

    #[error("{}\nExit code {}", path.display(), describe_exit(*code))]
    #[diagnostic(code(golden::child))]
    ExitStatus { path: PathBuf, code: Option<i32> },

    #[error("{}\nFailed to compile (exit code {}): {}", path.display(), describe_exit(*code), stderr.trim_end_matches('\n'))]
    #[diagnostic(code(golden::compile))]
    CompileFailed {
        path: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{}\nCompiler succeeded but did not produce {}", path.display(), artifact.display())]
    #[diagnostic(code(golden::compile), help("the compiler must leave its artifact in the working directory"))]
    MissingArtifact { path: PathBuf, artifact: PathBuf },

    #[error("Failed to remove stale artifact {}: {source}", artifact.display())]
    #[diagnostic(code(golden::compile))]
    StaleArtifact {
        artifact: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write report: {0}")]
    #[diagnostic(code(golden::report))]
    Report(#[source] io::Error),
}

/// Render an exit status code, which is absent when the child was killed by a signal.
fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_stderr_leads_with_path() {
        let err = HarnessError::ChildStderr {
            path: PathBuf::from("examples/arith/arith.va"),
            stderr: "boom\n".to_string(),
        };
        assert_eq!(err.to_string(), "examples/arith/arith.va\nboom\n");
    }

    #[test]
    fn test_child_stderr_is_verbatim() {
        let err = HarnessError::ChildStderr {
            path: PathBuf::from("examples/arith/arith.va"),
            stderr: "boom\n\n  at line 3\n\n".to_string(),
        };
        assert_eq!(err.to_string(), "examples/arith/arith.va\nboom\n\n  at line 3\n\n");
    }

    #[test]
    fn test_exit_status_without_code() {
        let err = HarnessError::ExitStatus {
            path: PathBuf::from("a.va"),
            code: None,
        };
        assert_eq!(err.to_string(), "a.va\nExit code none (terminated by signal)");
    }

    #[test]
    fn test_compile_failure_mentions_stderr() {
        let err = HarnessError::CompileFailed {
            path: PathBuf::from("test/bad.va"),
            code: Some(2),
            stderr: "syntax error\n".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("test/bad.va\n"));
        assert!(msg.contains("exit code 2"));
        assert!(msg.contains("syntax error"));
    }

    #[test]
    fn test_diagnostic_codes() {
        let err = HarnessError::InvalidName { path: PathBuf::from("x") };
        assert_eq!(err.code().map(|c| c.to_string()).as_deref(), Some("golden::discovery"));
    }
}
