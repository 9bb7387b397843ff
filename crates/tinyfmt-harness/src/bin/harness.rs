//! CLI entrypoint for the tinyfmt conformance harness.

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tinyfmt_core::{FormatArg, format_to_vec, snprintf, try_format};
use tinyfmt_harness::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome, now_utc};
use tinyfmt_harness::{
    ConformanceReport, FixtureArg, FixtureSet, HarnessConfig, HarnessError, SinkMode, TestRunner,
    VerificationSummary, fixtures, structured_log,
};

/// Conformance tooling for tinyfmt.
#[derive(Debug, Parser)]
#[command(name = "tinyfmt-harness")]
#[command(about = "Conformance testing harness for tinyfmt")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify the formatter against fixture files.
    Verify {
        /// Directory containing fixture JSON files [env: TINYFMT_FIXTURE_DIR].
        #[arg(long)]
        fixture: Option<PathBuf>,
        /// Output report path (markdown; JSON is written alongside) [env: TINYFMT_REPORT].
        #[arg(long)]
        report: Option<PathBuf>,
        /// Structured JSONL log path [env: TINYFMT_LOG].
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Format one string and print the result.
    Render {
        /// `unbounded` or `bounded:<capacity>`.
        #[arg(long, default_value = "unbounded")]
        sink: String,
        /// Format string.
        format: String,
        /// Arguments as `<kind>:<value>` (kinds: int, uint, char, ptr, str).
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Validate a structured JSONL log file.
    ValidateLog {
        /// Path to the JSONL file.
        path: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Verify {
            fixture,
            report,
            log,
        } => {
            let config = HarnessConfig::from_env().with_overrides(fixture, log, report);
            verify(&config)?;
        }
        Command::Render { sink, format, args } => {
            let mode = SinkMode::from_str_loose(&sink)
                .ok_or_else(|| format!("Unsupported sink '{sink}', expected unbounded|bounded:<n>"))?;
            let fixture_args = args
                .iter()
                .map(|a| FixtureArg::from_cli(a))
                .collect::<Result<Vec<_>, HarnessError>>()?;
            let format_args: Vec<FormatArg<'_>> =
                fixture_args.iter().map(FixtureArg::as_format_arg).collect();
            let fmt = format.as_bytes();

            let (bytes, count) = match mode {
                SinkMode::Unbounded => {
                    let out = format_to_vec(fmt, format_args.iter().copied());
                    let count = out.len();
                    (out, count)
                }
                SinkMode::Bounded { capacity } => {
                    let mut dest = vec![0u8; capacity];
                    let count = snprintf(&mut dest, fmt, format_args.iter().copied());
                    dest.truncate(count.min(capacity.saturating_sub(1)));
                    (dest, count)
                }
            };

            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.write_all(b"\n")?;
            eprintln!("count={count}");
            if let Err(reason) = try_format(&mut |_: u8| {}, fmt, format_args.iter().copied()) {
                eprintln!("stopped early: {reason}");
            }
        }
        Command::ValidateLog { path } => {
            let (lines, errors) = structured_log::validate_log_file(&path)?;
            for err in &errors {
                eprintln!("{err}");
            }
            eprintln!(
                "Validated {}: lines={lines}, errors={}",
                path.display(),
                errors.len()
            );
            if !errors.is_empty() {
                return Err("Log validation failed".into());
            }
        }
    }

    Ok(())
}

fn verify(config: &HarnessConfig) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Verifying against fixtures in {}", config.fixture_dir.display());
    let mut fixture_sets = Vec::new();
    for path in fixtures::fixture_paths(&config.fixture_dir)? {
        match FixtureSet::from_file(&path) {
            Ok(set) => fixture_sets.push(set),
            Err(err) => eprintln!("Skipping {}: {}", path.display(), err),
        }
    }
    if fixture_sets.is_empty() {
        return Err(HarnessError::NoFixtures(config.fixture_dir.clone()).into());
    }

    let runner = TestRunner::new("fixture-verify");
    let mut log = match &config.log_path {
        Some(path) => {
            let run_id = format!("run-{}", std::process::id());
            Some(LogEmitter::to_file(path, &runner.campaign, &run_id)?)
        }
        None => None,
    };
    if let Some(log) = log.as_mut() {
        log.emit(LogLevel::Info, "run_start")?;
    }

    let mut results = Vec::new();
    for set in &fixture_sets {
        let set_results = runner.run(set);
        if let Some(log) = log.as_mut() {
            for r in &set_results {
                let (level, outcome) = if r.passed {
                    (LogLevel::Info, Outcome::Pass)
                } else {
                    (LogLevel::Error, Outcome::Fail)
                };
                log.emit_entry(
                    LogEntry::new("", level, "case_result")
                        .with_family(&set.family)
                        .with_case(&r.case_name, &r.section)
                        .with_outcome(outcome)
                        .with_duration_ns(r.duration_ns)
                        .with_details(serde_json::json!({
                            "actual_count": r.actual_count,
                            "abort": r.abort,
                        })),
                )?;
            }
        }
        results.extend(set_results);
    }

    let summary = VerificationSummary::from_results(results);
    let report_doc = ConformanceReport {
        title: String::from("tinyfmt Conformance Report"),
        families: fixture_sets.iter().map(|s| s.family.clone()).collect(),
        timestamp: now_utc(),
        summary,
    };

    eprintln!(
        "Verification complete: total={}, passed={}, failed={}",
        report_doc.summary.total, report_doc.summary.passed, report_doc.summary.failed
    );
    for failure in report_doc.summary.failures() {
        eprintln!("FAIL {}", failure.case_name);
        if let Some(diff) = &failure.diff {
            eprintln!("{diff}");
        }
    }

    if let Some(log) = log.as_mut() {
        log.emit_entry(
            LogEntry::new("", LogLevel::Info, "run_end").with_details(serde_json::json!({
                "total": report_doc.summary.total,
                "passed": report_doc.summary.passed,
                "failed": report_doc.summary.failed,
            })),
        )?;
        log.flush()?;
    }

    if let Some(report_path) = &config.report_path {
        eprintln!("Writing report to {}", report_path.display());
        std::fs::write(report_path, report_doc.to_markdown())?;
        let json_path = report_path.with_extension("json");
        std::fs::write(&json_path, report_doc.to_json())?;
    }

    if !report_doc.summary.all_passed() {
        return Err("Conformance verification failed".into());
    }
    Ok(())
}
