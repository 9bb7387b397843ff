//! Test execution engine.

use std::time::Instant;

use tinyfmt_core::{FormatError, snprintf, sprintf, try_format};

use crate::config::SinkMode;
use crate::error::HarnessError;
use crate::fixtures::{FixtureCase, FixtureSet};
use crate::diff;
use crate::verify::VerificationResult;

/// What one case produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRun {
    /// Bytes stored in the destination, up to (not including) the terminator.
    pub output: Vec<u8>,
    /// Count the adapter reported.
    pub count: usize,
    /// Whether the terminator landed right after `output`.
    pub terminated: bool,
    /// Why formatting stopped early, if it did.
    pub abort: Option<FormatError>,
}

/// Format one case through the adapter its sink mode names.
pub fn execute_case(case: &FixtureCase) -> Result<CaseRun, HarnessError> {
    let fmt = case.format.as_bytes();
    let args = case.format_args();

    let mut probe: Vec<u8> = Vec::new();
    let abort = try_format(&mut |b: u8| probe.push(b), fmt, args.iter().copied()).err();

    match case.sink_mode()? {
        SinkMode::Unbounded => {
            let mut dest = vec![0xAAu8; probe.len() + 1];
            let count = sprintf(&mut dest, fmt, args.iter().copied());
            let terminated = dest.get(count) == Some(&0);
            dest.truncate(count);
            Ok(CaseRun {
                output: dest,
                count,
                terminated,
                abort,
            })
        }
        SinkMode::Bounded { capacity } => {
            let mut dest = vec![0xAAu8; capacity];
            let count = snprintf(&mut dest, fmt, args.iter().copied());
            let (stored, terminated) = match capacity.checked_sub(1) {
                Some(last) => {
                    let stored = count.min(last);
                    (stored, dest[stored] == 0)
                }
                None => (0, true),
            };
            dest.truncate(stored);
            Ok(CaseRun {
                output: dest,
                count,
                terminated,
                abort,
            })
        }
    }
}

/// Runs a fixture set and collects verification results.
pub struct TestRunner {
    /// Name of the test campaign; prefixes the trace ids of its log lines.
    pub campaign: String,
}

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub fn new(campaign: impl Into<String>) -> Self {
        Self {
            campaign: campaign.into(),
        }
    }

    /// Run all fixtures in a set and return results.
    pub fn run(&self, fixture_set: &FixtureSet) -> Vec<VerificationResult> {
        fixture_set.cases.iter().map(verify_case).collect()
    }
}

fn verify_case(case: &FixtureCase) -> VerificationResult {
    let started = Instant::now();
    let execution = execute_case(case);
    let duration_ns = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);

    match execution {
        Ok(run) => {
            let actual = String::from_utf8_lossy(&run.output).into_owned();
            let mut notes = Vec::new();
            if let Some(expected) = case.expected_count
                && expected != run.count
            {
                notes.push(format!("count mismatch: expected {expected}, got {}", run.count));
            }
            if !run.terminated {
                notes.push(String::from("destination not NUL-terminated after output"));
            }

            let output_matches = actual == case.expected_output;
            let diff = if !output_matches {
                let mut d = diff::render_diff(&case.expected_output, &actual);
                for note in &notes {
                    d.push_str(note);
                    d.push('\n');
                }
                Some(d)
            } else if !notes.is_empty() {
                Some(notes.join("\n"))
            } else {
                None
            };

            VerificationResult {
                case_name: case.name.clone(),
                section: case.section.clone(),
                passed: output_matches && notes.is_empty(),
                expected: case.expected_output.clone(),
                actual,
                expected_count: case.expected_count,
                actual_count: run.count,
                abort: run.abort.map(|e| e.to_string()),
                duration_ns,
                diff,
            }
        }
        Err(err) => {
            let actual = format!("unsupported:{err}");
            VerificationResult {
                case_name: case.name.clone(),
                section: case.section.clone(),
                passed: false,
                diff: Some(diff::render_diff(&case.expected_output, &actual)),
                expected: case.expected_output.clone(),
                actual,
                expected_count: case.expected_count,
                actual_count: 0,
                abort: None,
                duration_ns,
            }
        }
    }
}
