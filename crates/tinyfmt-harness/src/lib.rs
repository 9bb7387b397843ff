//! Conformance testing harness for tinyfmt.
//!
//! This crate provides:
//! - Fixtures: JSON cases pairing a format string and typed arguments with
//!   the exact expected output and count
//! - Runner: drives each case through the `sprintf` or `snprintf` adapter
//! - Verification summaries, diffs, and markdown/JSON reports
//! - Structured JSONL run logs and their validator

#![forbid(unsafe_code)]

pub mod config;
pub mod diff;
pub mod error;
pub mod fixtures;
pub mod report;
pub mod runner;
pub mod structured_log;
pub mod verify;

pub use config::{HarnessConfig, SinkMode};
pub use error::HarnessError;
pub use fixtures::{FixtureArg, FixtureCase, FixtureSet};
pub use report::ConformanceReport;
pub use runner::TestRunner;
pub use verify::{VerificationResult, VerificationSummary};
