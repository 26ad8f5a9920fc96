//! Test cases and their on-disk fixtures

use std::fs;
use std::path::{Path, PathBuf};

use super::error::HarnessError;

/// How a case's program is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// The interpreter runs the source directly, reading input from stdin.
    Direct,
    /// The compiler produces an artifact which a second runtime executes.
    CompileThenRun,
}

impl ExecutionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionMode::Direct => "direct",
            ExecutionMode::CompileThenRun => "compile-then-run",
        }
    }
}

/// A runnable case: one example program plus its golden output and optional input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    name: String,
    source: PathBuf,
    expected: PathBuf,
    input: Option<PathBuf>,
    mode: ExecutionMode,
}

impl TestCase {
    pub fn new(
        name: impl Into<String>,
        source: impl Into<PathBuf>,
        expected: impl Into<PathBuf>,
        input: Option<PathBuf>,
        mode: ExecutionMode,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            expected: expected.into(),
            input,
            mode,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Program source handed to the binary under test.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Golden output fixture.
    pub fn expected(&self) -> &Path {
        &self.expected
    }

    /// Input fixture, present only when the file exists on disk.
    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }
}

/// Outcome of resolving a case name against the corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Runnable(TestCase),
    /// No golden output has been recorded for this case yet.
    Skipped,
}

/// Read a fixture that resolution decided must exist.
pub fn read_fixture(path: &Path) -> Result<String, HarnessError> {
    fs::read_to_string(path).map_err(|source| HarnessError::FixtureRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the case input, substituting the empty string when there is no input fixture.
pub fn read_input(case: &TestCase) -> Result<String, HarnessError> {
    match case.input() {
        Some(path) => read_fixture(path),
        None => Ok(String::new()),
    }
}

/// Resolve an optional fixture path to `Some` only if the file exists.
pub(crate) fn existing(path: PathBuf) -> Option<PathBuf> {
    path.exists().then_some(path)
}
