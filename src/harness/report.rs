//! Run summary and reporters
//!
//! ## HarnessReporter Trait
//!
//! The pipeline reports through the `HarnessReporter` trait so that execution stays separate from
//! presentation. [`ConsoleReporter`] prints the classic plain-text report; [`JsonReporter`] emits one
//! machine-readable document when the run completes.
//!
//! Reporters are not told about fatal errors. An aborted run produces no summary.

use std::io::{self, Write};
use std::path::Path;

use serde_json::json;

use super::compare::{CaseOutcome, line_diff};
use super::fixture::TestCase;
use crate::version::GOLDEN_VERSION;

// ============================================================================
// Run summary
// ============================================================================

/// Aggregate counts for one harness run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    /// Skipped case names, in discovery order.
    pub skipped: Vec<String>,
    /// Cases whose output did not match, in discovery order.
    pub mismatched: Vec<String>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &str, outcome: &CaseOutcome) {
        match outcome {
            CaseOutcome::Passed => self.passed += 1,
            CaseOutcome::Skipped => self.skipped.push(name.to_string()),
            CaseOutcome::Mismatch { .. } => self.mismatched.push(name.to_string()),
        }
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn has_mismatches(&self) -> bool {
        !self.mismatched.is_empty()
    }
}

// ============================================================================
// Reporter trait
// ============================================================================

/// Trait for reporting harness progress and results.
///
/// Implement this trait to customize the report format.
pub trait HarnessReporter {
    /// Called once the case list is known
    fn on_discovery_complete(&mut self, _root: &Path, _case_count: usize) -> io::Result<()> {
        Ok(())
    }

    /// Called for a case without golden output
    fn on_case_skipped(&mut self, _name: &str) -> io::Result<()> {
        Ok(())
    }

    /// Called when a runnable case has been executed and compared
    fn on_case_complete(&mut self, case: &TestCase, outcome: &CaseOutcome) -> io::Result<()>;

    /// Called after every case has been processed
    fn on_run_complete(&mut self, summary: &RunSummary) -> io::Result<()>;
}

// ============================================================================
// Console reporter
// ============================================================================

/// Plain-text reporter.
///
/// Mismatches print the case path followed by the expected and actual output in full. The summary
/// lists passed and skipped counts, then the name of every skipped case.
pub struct ConsoleReporter<W: Write> {
    out: W,
    pub verbose: bool,
    pub color: bool,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout(verbose: bool, color: bool) -> Self {
        Self::new(io::stdout(), verbose, color)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, verbose: bool, color: bool) -> Self {
        Self { out, verbose, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    }
}

impl<W: Write> HarnessReporter for ConsoleReporter<W> {
    fn on_discovery_complete(&mut self, root: &Path, case_count: usize) -> io::Result<()> {
        if self.verbose {
            writeln!(self.out, "collected {} case(s) from {}", case_count, root.display())?;
        }
        Ok(())
    }

    fn on_case_skipped(&mut self, name: &str) -> io::Result<()> {
        if self.verbose {
            let status = self.paint("SKIPPED", "33");
            writeln!(self.out, "{} {}", name, status)?;
        }
        Ok(())
    }

    fn on_case_complete(&mut self, case: &TestCase, outcome: &CaseOutcome) -> io::Result<()> {
        match outcome {
            CaseOutcome::Passed => {
                if self.verbose {
                    let status = self.paint("PASSED", "32");
                    writeln!(self.out, "{} {}", case.name(), status)?;
                }
            }
            // Reported through `on_case_skipped`
            CaseOutcome::Skipped => {}
            CaseOutcome::Mismatch { expected, actual } => {
                if self.verbose {
                    let status = self.paint("FAILED", "31");
                    writeln!(self.out, "{} {}", case.name(), status)?;
                }
                writeln!(self.out, "{}", case.source().display())?;
                writeln!(
                    self.out,
                    "Output doesn't match expected.\nExpected:\n{}\nActual:\n{}",
                    expected, actual
                )?;
                if self.verbose {
                    writeln!(self.out, "Diff:")?;
                    write!(self.out, "{}", line_diff(expected, actual))?;
                }
            }
        }
        Ok(())
    }

    fn on_run_complete(&mut self, summary: &RunSummary) -> io::Result<()> {
        writeln!(self.out, "Passed : {}", summary.passed)?;
        writeln!(self.out, "Skipped: {}", summary.skipped_count())?;
        for name in &summary.skipped {
            writeln!(self.out, "{}", name)?;
        }
        self.out.flush()
    }
}

// ============================================================================
// JSON reporter
// ============================================================================

/// Collects mismatches and writes a single JSON document when the run completes.
pub struct JsonReporter<W: Write> {
    out: W,
    mismatches: Vec<serde_json::Value>,
}

impl JsonReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            mismatches: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> HarnessReporter for JsonReporter<W> {
    fn on_case_complete(&mut self, case: &TestCase, outcome: &CaseOutcome) -> io::Result<()> {
        if let CaseOutcome::Mismatch { expected, actual } = outcome {
            self.mismatches.push(json!({
                "case": case.name(),
                "path": case.source().display().to_string(),
                "expected": expected,
                "actual": actual,
            }));
        }
        Ok(())
    }

    fn on_run_complete(&mut self, summary: &RunSummary) -> io::Result<()> {
        let report = json!({
            "version": GOLDEN_VERSION,
            "passed": summary.passed,
            "skipped": summary.skipped,
            "mismatched": self.mismatches,
        });
        serde_json::to_writer_pretty(&mut self.out, &report)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}
