//! Golden-output conformance harness
//!
//! Drives a binary under test against a corpus of example programs and checks that each program's
//! stdout matches its recorded golden output byte-for-byte.
//!
//! ## Pipeline
//!
//! Discovery → resolution (per case) → execution (per runnable case) → comparison → reporting.
//! Cases are processed one at a time in discovery order.
//!
//! ## Outcomes
//!
//! Each case ends in one of three ways, see [`CaseOutcome`]:
//! - `Passed` - output matched
//! - `Skipped` - no golden output recorded; nothing was executed
//! - `Mismatch` - reported, and the run carries on
//!
//! Anything else is a [`HarnessError`]: the run stops at that case and no summary is printed.
//!
//! ## Modules
//!
//! - `discovery` - flat and per-case-directory corpus layouts
//! - `execute` - direct-run and compile-then-run execution
//! - `compare` - exact comparison and mismatch diffs
//! - `report` - run summary and reporters
//! - `interfaces` - the discovery/executor seams

pub mod compare;
pub mod discovery;
pub mod error;
pub mod execute;
pub mod fixture;
pub mod interfaces;
pub mod report;

use std::path::PathBuf;

pub use compare::{CaseOutcome, compare, line_diff};
pub use discovery::{CaseDirLayout, FlatLayout, Layout};
pub use error::HarnessError;
pub use execute::{CompileThenRun, DirectRun, Execution, ExecutionResult};
pub use fixture::{ExecutionMode, Resolution, TestCase};
pub use interfaces::{CaseDiscovery, CaseExecutor};
pub use report::{ConsoleReporter, HarnessReporter, JsonReporter, RunSummary};

// ============================================================================
// Configuration
// ============================================================================

/// Which corpus to read and how to run it.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub layout: Layout,
    pub execution: Execution,
}

impl HarnessConfig {
    /// `examples/<name>/` directories run directly by the interpreter.
    pub fn direct_run() -> Self {
        Self {
            layout: Layout::CaseDirs(CaseDirLayout::default()),
            execution: Execution::Direct(DirectRun::default()),
        }
    }

    /// `test/<name>.va` sources compiled to an artifact and run by a separate runtime.
    pub fn compile_then_run() -> Self {
        Self {
            layout: Layout::Flat(FlatLayout::default()),
            execution: Execution::CompileThenRun(CompileThenRun::default()),
        }
    }

    /// Replace the corpus layout
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Replace the execution strategy
    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Point every case at a different interpreter or compiler binary.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        match &mut self.execution {
            Execution::Direct(direct) => direct.interpreter = binary.into(),
            Execution::CompileThenRun(compiled) => compiled.compiler = binary.into(),
        }
        self
    }

    pub fn into_harness(self) -> Harness<Layout, Execution> {
        Harness::new(self.layout, self.execution)
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::direct_run()
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// The discover → resolve → execute → compare pipeline over a pair of strategies.
pub struct Harness<D, E> {
    discovery: D,
    executor: E,
}

impl<D: CaseDiscovery, E: CaseExecutor> Harness<D, E> {
    pub fn new(discovery: D, executor: E) -> Self {
        Self { discovery, executor }
    }

    pub fn discovery(&self) -> &D {
        &self.discovery
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Run every discovered case and report the results.
    ///
    /// Returns the summary on completion. The first harness-level failure aborts the run and is
    /// returned as-is; the reporter's `on_run_complete` is not called in that case.
    pub fn run(&self, reporter: &mut dyn HarnessReporter) -> Result<RunSummary, HarnessError> {
        let names = self.discovery.discover()?;
        tracing::info!(root = %self.discovery.root().display(), cases = names.len(), "discovered cases");
        reporter
            .on_discovery_complete(self.discovery.root(), names.len())
            .map_err(HarnessError::Report)?;

        let mut summary = RunSummary::new();
        for name in &names {
            let outcome = self.run_case(name, reporter)?;
            summary.record(name, &outcome);
        }

        reporter.on_run_complete(&summary).map_err(HarnessError::Report)?;
        Ok(summary)
    }

    /// Resolve, execute and compare a single case.
    #[tracing::instrument(skip(self, reporter), fields(mode = self.executor.mode().as_str()))]
    pub fn run_case(&self, name: &str, reporter: &mut dyn HarnessReporter) -> Result<CaseOutcome, HarnessError> {
        let case = match self.discovery.resolve(name, self.executor.mode())? {
            Resolution::Runnable(case) => case,
            Resolution::Skipped => {
                reporter.on_case_skipped(name).map_err(HarnessError::Report)?;
                return Ok(CaseOutcome::Skipped);
            }
        };

        let expected = fixture::read_fixture(case.expected())?;
        let input = fixture::read_input(&case)?;

        let result = self.executor.execute(&case, &input)?;
        result.ensure_clean(&case)?;

        let outcome = compare(&expected, &result.stdout);
        tracing::debug!(mismatch = outcome.is_mismatch(), "compared");
        reporter.on_case_complete(&case, &outcome).map_err(HarnessError::Report)?;
        Ok(outcome)
    }
}

/// Run the harness described by `config`.
pub fn run_harness(config: HarnessConfig, reporter: &mut dyn HarnessReporter) -> Result<RunSummary, HarnessError> {
    config.into_harness().run(reporter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_run_preset() {
        let config = HarnessConfig::direct_run();
        assert!(matches!(config.layout, Layout::CaseDirs(ref l) if l.root == PathBuf::from("examples")));
        assert!(matches!(config.execution, Execution::Direct(ref d) if d.interpreter == PathBuf::from("./target/debug/verbena")));
    }

    #[test]
    fn test_compile_then_run_preset() {
        let config = HarnessConfig::compile_then_run();
        let Layout::Flat(layout) = &config.layout else {
            panic!("Expected flat layout");
        };
        assert_eq!(layout.source_dir, PathBuf::from("test"));
        assert_eq!(layout.expected_dir, PathBuf::from("test_output"));
        let Execution::CompileThenRun(compiled) = &config.execution else {
            panic!("Expected compile-then-run");
        };
        assert_eq!(compiled.runtime, PathBuf::from("node"));
        assert_eq!(compiled.artifact, PathBuf::from("a.mjs"));
    }

    #[test]
    fn test_with_binary_targets_mode() {
        let config = HarnessConfig::compile_then_run().with_binary("bin/vc");
        let Execution::CompileThenRun(compiled) = &config.execution else {
            panic!("Expected compile-then-run");
        };
        assert_eq!(compiled.compiler, PathBuf::from("bin/vc"));

        let config = HarnessConfig::default().with_binary("bin/vi");
        let Execution::Direct(direct) = &config.execution else {
            panic!("Expected direct run");
        };
        assert_eq!(direct.interpreter, PathBuf::from("bin/vi"));
    }
}
