#![forbid(unsafe_code)]
//! Golden-output conformance harness
//!
//! Runs the Verbena interpreter (or compiler plus a JavaScript runtime) against a corpus of example
//! programs and checks every program's stdout against its recorded golden output.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod harness;
pub mod version;

pub use harness::{
    CaseOutcome, Harness, HarnessConfig, HarnessError, HarnessReporter, RunSummary, TestCase, run_harness,
};
