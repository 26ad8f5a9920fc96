//! CLI module for the golden-output harness
//!
//! ## Commands
//!
//! - `golden` / `golden examples` - run `examples/<name>/` cases directly through the interpreter
//! - `golden compiled` - compile `test/<name>.va` cases and run the artifact with a separate runtime
//!
//! With no flags every path follows the repository conventions; flags only override them.
//!
//! ## Output streams
//!
//! Reports go to stdout. Fatal diagnostics (the offending path plus the child's stderr or the I/O cause)
//! go to stderr, not stdout, so redirecting stdout captures only the report. Scripts that expected the
//! diagnostic on stdout should capture stderr as well (`2>&1`).
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::fmt;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use miette::Diagnostic;

use crate::harness::{
    CaseDirLayout, CompileThenRun, ConsoleReporter, DirectRun, Execution, FlatLayout, HarnessConfig, HarnessError,
    HarnessReporter, JsonReporter, Layout, RunSummary, run_harness,
};
use crate::version::GOLDEN_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<HarnessError> for CliError {
    fn from(err: HarnessError) -> Self {
        let mut message = err.to_string();
        if let Some(help) = err.help() {
            message.push_str(&format!("\nhelp: {}", help));
        }
        CliError::failure(message)
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Golden-output conformance harness
#[derive(Parser, Debug)]
#[command(name = "golden")]
#[command(version = GOLDEN_VERSION)]
#[command(about = "Run example programs and compare their output against recorded golden output", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub report: ReportArgs,
}

/// Reporting options shared by every mode.
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Print one status line per case and a diff under each mismatch
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console, global = true)]
    pub format: ReportFormat,

    /// Exit with status 1 when any case's output does not match
    #[arg(long, global = true)]
    pub fail_on_mismatch: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Console,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run examples/<name>/ cases directly through the interpreter (default)
    Examples {
        /// Directory holding one subdirectory per case
        #[arg(long, value_name = "DIR", default_value = "examples")]
        root: PathBuf,
        /// Interpreter binary under test
        #[arg(long, value_name = "PATH", default_value = crate::harness::execute::DEFAULT_BINARY)]
        interpreter: PathBuf,
    },

    /// Compile test/<name>.va cases and run the artifact with a separate runtime
    Compiled {
        /// Directory of source files
        #[arg(long, value_name = "DIR", default_value = "test")]
        sources: PathBuf,
        /// Directory of golden output files
        #[arg(long, value_name = "DIR", default_value = "test_output")]
        expected: PathBuf,
        /// Compiler binary under test
        #[arg(long, value_name = "PATH", default_value = crate::harness::execute::DEFAULT_BINARY)]
        compiler: PathBuf,
        /// Runtime that executes the compiled artifact
        #[arg(long, value_name = "PATH", default_value = "node")]
        runtime: PathBuf,
        /// Artifact the compiler writes to the working directory
        #[arg(long, value_name = "FILE", default_value = "a.mjs")]
        artifact: PathBuf,
        /// Leave a previous case's artifact in place before compiling
        #[arg(long)]
        keep_artifact: bool,
    },
}

impl Command {
    /// Build the harness configuration for this command.
    pub fn config(self) -> HarnessConfig {
        match self {
            Command::Examples { root, interpreter } => HarnessConfig::direct_run()
                .with_layout(Layout::CaseDirs(CaseDirLayout {
                    root,
                    ..CaseDirLayout::default()
                }))
                .with_execution(Execution::Direct(DirectRun { interpreter })),
            Command::Compiled {
                sources,
                expected,
                compiler,
                runtime,
                artifact,
                keep_artifact,
            } => HarnessConfig::compile_then_run()
                .with_layout(Layout::Flat(FlatLayout {
                    source_dir: sources,
                    expected_dir: expected,
                    ..FlatLayout::default()
                }))
                .with_execution(Execution::CompileThenRun(CompileThenRun {
                    compiler,
                    runtime,
                    artifact,
                    remove_stale_artifact: !keep_artifact,
                })),
        }
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. The harness returns
/// `Result` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if e.message.ends_with('\n') {
                eprint!("{}", e.message);
            } else if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    let config = match cli.command {
        Some(command) => command.config(),
        None => HarnessConfig::direct_run(),
    };

    let summary = match cli.report.format {
        ReportFormat::Console => {
            let color = io::stdout().is_terminal();
            run_with(config, &mut ConsoleReporter::stdout(cli.report.verbose, color))?
        }
        ReportFormat::Json => run_with(config, &mut JsonReporter::stdout())?,
    };

    if cli.report.fail_on_mismatch && summary.has_mismatches() {
        // Mismatches were already reported per case
        return Err(CliError::new("", ExitCode::FAILURE));
    }
    Ok(ExitCode::SUCCESS)
}

fn run_with(config: HarnessConfig, reporter: &mut dyn HarnessReporter) -> CliResult<RunSummary> {
    Ok(run_harness(config, reporter)?)
}

// ============================================================================
// Tests
// ============================================================================
