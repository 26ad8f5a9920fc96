//! Process execution for the binaries under test
//!
//! ## Modes
//!
//! - [`DirectRun`]: `<interpreter> <source>` with the case input on stdin, written concurrently with
//!   reading stdout and stderr.
//! - [`CompileThenRun`]: `<compiler> <source>` must exit cleanly and leave an artifact behind, then
//!   `<runtime> <artifact>` runs with no stdin. The compiler's exit status is always checked before the
//!   runtime is spawned; a stale artifact must never stand in for a failed compile.
//!
//! Every child is awaited to completion. There is no timeout.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::thread;

use super::error::HarnessError;
use super::fixture::{ExecutionMode, TestCase};
use super::interfaces::CaseExecutor;

/// Default location of the binary under test, relative to the working directory.
pub const DEFAULT_BINARY: &str = "./target/debug/verbena";

/// Captured output of the program under test for one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the child was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl ExecutionResult {
    /// Decode a finished child's output. Non-UTF-8 output is a tooling failure.
    fn from_output(case: &TestCase, output: Output) -> Result<Self, HarnessError> {
        Ok(Self {
            stdout: decode(case, output.stdout, "stdout")?,
            stderr: decode(case, output.stderr, "stderr")?,
            exit_code: output.status.code(),
        })
    }

    /// Reject results that signal a tooling failure rather than program output.
    ///
    /// Any stderr output is fatal, and so is any exit status other than zero.
    pub fn ensure_clean(&self, case: &TestCase) -> Result<(), HarnessError> {
        if !self.stderr.is_empty() {
            return Err(HarnessError::ChildStderr {
                path: case.source().to_path_buf(),
                stderr: self.stderr.clone(),
            });
        }
        if self.exit_code != Some(0) {
            return Err(HarnessError::ExitStatus {
                path: case.source().to_path_buf(),
                code: self.exit_code,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Direct-run mode
// ============================================================================

/// Run the interpreter on the source file, feeding the case input through stdin.
#[derive(Debug, Clone)]
pub struct DirectRun {
    pub interpreter: PathBuf,
}

impl Default for DirectRun {
    fn default() -> Self {
        Self {
            interpreter: PathBuf::from(DEFAULT_BINARY),
        }
    }
}

impl CaseExecutor for DirectRun {
    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Direct
    }

    fn execute(&self, case: &TestCase, input: &str) -> Result<ExecutionResult, HarnessError> {
        tracing::debug!(interpreter = %self.interpreter.display(), source = %case.source().display(), "spawning");

        let mut child = Command::new(&self.interpreter)
            .arg(case.source())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| spawn_error(case, &self.interpreter, source))?;

        // Feed stdin on its own thread while stdout and stderr drain, so neither pipe can fill up.
        let stdin = child.stdin.take();
        let (output, written) = thread::scope(|scope| {
            let writer = stdin.map(|mut stdin| scope.spawn(move || stdin.write_all(input.as_bytes())));
            let output = child.wait_with_output();
            let written = match writer {
                Some(handle) => handle
                    .join()
                    .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked"))),
                None => Ok(()),
            };
            (output, written)
        });

        match written {
            Ok(()) => {}
            // The interpreter exited without reading all of its input; its exit status decides.
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                tracing::debug!(case = case.name(), "interpreter closed stdin early");
            }
            Err(source) => return Err(communicate_error(case, source)),
        }

        let output = output.map_err(|source| communicate_error(case, source))?;
        ExecutionResult::from_output(case, output)
    }
}

// ============================================================================
// Compile-then-run mode
// ============================================================================

/// Compile the source to an artifact, then execute the artifact with a separate runtime.
#[derive(Debug, Clone)]
pub struct CompileThenRun {
    pub compiler: PathBuf,
    pub runtime: PathBuf,
    /// Artifact the compiler leaves behind, relative to the working directory.
    pub artifact: PathBuf,
    /// Remove an artifact left over from a previous case before compiling.
    pub remove_stale_artifact: bool,
}

impl Default for CompileThenRun {
    fn default() -> Self {
        Self {
            compiler: PathBuf::from(DEFAULT_BINARY),
            runtime: PathBuf::from("node"),
            artifact: PathBuf::from("a.mjs"),
            remove_stale_artifact: true,
        }
    }
}

impl CompileThenRun {
    /// Run the compiler and insist on a clean exit before anything else happens.
    fn compile(&self, case: &TestCase) -> Result<(), HarnessError> {
        if self.remove_stale_artifact {
            self.remove_artifact()?;
        }

        tracing::debug!(compiler = %self.compiler.display(), source = %case.source().display(), "compiling");
        let output = Command::new(&self.compiler)
            .arg(case.source())
            .stdin(Stdio::null())
            .output()
            .map_err(|source| spawn_error(case, &self.compiler, source))?;
        let compiled = ExecutionResult::from_output(case, output)?;

        if compiled.exit_code != Some(0) || !compiled.stderr.is_empty() {
            return Err(HarnessError::CompileFailed {
                path: case.source().to_path_buf(),
                code: compiled.exit_code,
                stderr: compiled.stderr,
            });
        }
        if !compiled.stdout.is_empty() {
            tracing::debug!(case = case.name(), stdout = %compiled.stdout, "compiler output");
        }

        if !self.artifact.exists() {
            return Err(HarnessError::MissingArtifact {
                path: case.source().to_path_buf(),
                artifact: self.artifact.clone(),
            });
        }
        Ok(())
    }

    fn remove_artifact(&self) -> Result<(), HarnessError> {
        match fs::remove_file(&self.artifact) {
            Ok(()) => {
                tracing::debug!(artifact = %self.artifact.display(), "removed stale artifact");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(HarnessError::StaleArtifact {
                artifact: self.artifact.clone(),
                source,
            }),
        }
    }
}

impl CaseExecutor for CompileThenRun {
    fn mode(&self) -> ExecutionMode {
        ExecutionMode::CompileThenRun
    }

    fn execute(&self, case: &TestCase, input: &str) -> Result<ExecutionResult, HarnessError> {
        if !input.is_empty() {
            tracing::warn!(case = case.name(), "compiled programs take no stdin; ignoring input fixture");
        }

        self.compile(case)?;

        tracing::debug!(runtime = %self.runtime.display(), artifact = %self.artifact.display(), "running artifact");
        let output = Command::new(&self.runtime)
            .arg(&self.artifact)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| spawn_error(case, &self.runtime, source))?;
        ExecutionResult::from_output(case, output)
    }
}

// ============================================================================
// Closed set of execution strategies
// ============================================================================

/// The execution strategies the harness knows about.
#[derive(Debug, Clone)]
pub enum Execution {
    Direct(DirectRun),
    CompileThenRun(CompileThenRun),
}

impl CaseExecutor for Execution {
    fn mode(&self) -> ExecutionMode {
        match self {
            Execution::Direct(direct) => direct.mode(),
            Execution::CompileThenRun(compiled) => compiled.mode(),
        }
    }

    fn execute(&self, case: &TestCase, input: &str) -> Result<ExecutionResult, HarnessError> {
        match self {
            Execution::Direct(direct) => direct.execute(case, input),
            Execution::CompileThenRun(compiled) => compiled.execute(case, input),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn decode(case: &TestCase, bytes: Vec<u8>, stream: &'static str) -> Result<String, HarnessError> {
    String::from_utf8(bytes).map_err(|_| HarnessError::InvalidUtf8 {
        path: case.source().to_path_buf(),
        stream,
    })
}

fn spawn_error(case: &TestCase, program: &Path, source: io::Error) -> HarnessError {
    HarnessError::Spawn {
        path: case.source().to_path_buf(),
        program: program.display().to_string(),
        source,
    }
}

fn communicate_error(case: &TestCase, source: io::Error) -> HarnessError {
    HarnessError::Communicate {
        path: case.source().to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case() -> TestCase {
        TestCase::new("arith", "arith.va", "output.txt", None, ExecutionMode::Direct)
    }

    fn result(stdout: &str, stderr: &str, exit_code: Option<i32>) -> ExecutionResult {
        ExecutionResult {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            exit_code,
        }
    }

    #[test]
    fn test_clean_result() {
        assert!(result("20\n", "", Some(0)).ensure_clean(&case()).is_ok());
    }

    #[test]
    fn test_stderr_is_fatal_even_with_zero_exit() {
        let err = result("20\n", "warning\n", Some(0)).ensure_clean(&case()).unwrap_err();
        assert!(matches!(err, HarnessError::ChildStderr { .. }));
    }

    #[test]
    fn test_nonzero_exit_is_fatal() {
        let err = result("", "", Some(3)).ensure_clean(&case()).unwrap_err();
        assert!(matches!(err, HarnessError::ExitStatus { code: Some(3), .. }));
    }

    #[test]
    fn test_signal_exit_is_fatal() {
        let err = result("", "", None).ensure_clean(&case()).unwrap_err();
        assert!(matches!(err, HarnessError::ExitStatus { code: None, .. }));
    }

    #[test]
    fn test_stderr_reported_before_exit_code() {
        let err = result("", "panic\n", Some(101)).ensure_clean(&case()).unwrap_err();
        assert!(matches!(err, HarnessError::ChildStderr { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_fatal() {
        let err = decode(&case(), vec![0xff, 0xfe], "stdout").unwrap_err();
        assert!(matches!(err, HarnessError::InvalidUtf8 { stream: "stdout", .. }));
    }

    #[test]
    fn test_missing_interpreter_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let direct = DirectRun {
            interpreter: dir.path().join("no-such-interpreter"),
        };
        let err = direct.execute(&case(), "").unwrap_err();
        assert!(matches!(err, HarnessError::Spawn { .. }));
        assert!(err.to_string().starts_with("arith.va\n"));
    }

    #[test]
    fn test_stale_artifact_removed() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("a.mjs");
        fs::write(&artifact, "stale").unwrap();

        let compiled = CompileThenRun {
            artifact: artifact.clone(),
            ..CompileThenRun::default()
        };
        compiled.remove_artifact().unwrap();
        assert!(!artifact.exists());
        // Removing an absent artifact is fine.
        compiled.remove_artifact().unwrap();
    }

    #[test]
    fn test_execution_modes() {
        assert_eq!(Execution::Direct(DirectRun::default()).mode(), ExecutionMode::Direct);
        assert_eq!(
            Execution::CompileThenRun(CompileThenRun::default()).mode(),
            ExecutionMode::CompileThenRun
        );
    }
}
