//! Harness I/O boundary interfaces
//!
//! The pipeline touches the outside world in two places:
//! - Case discovery and fixture resolution (directory reads)
//! - Case execution (spawning the binaries under test)
//!
//! Both are traits so that [`Harness`](super::Harness) can be driven by the conventional strategies in
//! [`discovery`](super::discovery) and [`execute`](super::execute), or by fakes in tests.

use super::error::HarnessError;
use super::execute::ExecutionResult;
use super::fixture::{ExecutionMode, Resolution, TestCase};

// ============================================================================
// Case Discovery Interface
// ============================================================================

/// Enumerate case names and map each name to its fixtures.
pub trait CaseDiscovery {
    /// Directory the cases are discovered in (for logging and reports).
    fn root(&self) -> &std::path::Path;

    /// List case names in a deterministic order.
    ///
    /// An unreadable root is fatal; this never degrades to an empty list.
    fn discover(&self) -> Result<Vec<String>, HarnessError>;

    /// Resolve a case name to concrete fixture paths, or [`Resolution::Skipped`] when no golden
    /// output exists.
    fn resolve(&self, name: &str, mode: ExecutionMode) -> Result<Resolution, HarnessError>;
}

// ============================================================================
// Case Executor Interface
// ============================================================================

/// Run the program(s) under test for one case and capture what they produced.
pub trait CaseExecutor {
    fn mode(&self) -> ExecutionMode;

    /// Execute `case`, supplying `input` where the mode reads stdin.
    ///
    /// Returns exactly one result per call. Spawn failures are fatal.
    fn execute(&self, case: &TestCase, input: &str) -> Result<ExecutionResult, HarnessError>;
}
