//! Harness version information.
//!
//! The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time so the CLI and the JSON
//! report agree on the same string.

/// The harness version string (for example, `0.1.0`).
pub const GOLDEN_VERSION: &str = env!("CARGO_PKG_VERSION");
