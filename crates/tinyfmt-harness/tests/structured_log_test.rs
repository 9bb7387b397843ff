//! Integration test: JSONL run log contract.
//!
//! Run: cargo test -p tinyfmt-harness --test structured_log_test

use tinyfmt_harness::structured_log::{
    LogEmitter, LogEntry, LogLevel, Outcome, validate_log_file, validate_log_text,
};
use tinyfmt_harness::{FixtureSet, TestRunner};

const FIXTURE: &str = r#"{
    "version":"v1",
    "family":"format/log",
    "captured_at":"2026-10-19T00:00:00Z",
    "cases":[
        {"name":"ok","section":"width","format":"%3d","args":[{"int":5}],"expected_output":"  5"},
        {"name":"bad","section":"width","format":"%3d","args":[{"int":5}],"expected_output":"5"}
    ]
}"#;

fn log_run(emitter: &mut LogEmitter<impl std::io::Write>) {
    let set = FixtureSet::from_json(FIXTURE).unwrap();
    emitter.emit(LogLevel::Info, "run_start").unwrap();
    for r in TestRunner::new("log").run(&set) {
        let outcome = if r.passed { Outcome::Pass } else { Outcome::Fail };
        emitter
            .emit_entry(
                LogEntry::new("", LogLevel::Info, "case_result")
                    .with_family(&set.family)
                    .with_case(&r.case_name, &r.section)
                    .with_outcome(outcome)
                    .with_duration_ns(r.duration_ns),
            )
            .unwrap();
    }
    emitter.flush().unwrap();
}

#[test]
fn run_log_lines_validate_and_carry_outcomes() {
    let mut emitter = LogEmitter::to_buffer("verify", "t1");
    log_run(&mut emitter);
    let text = emitter.contents();

    let (count, errors) = validate_log_text(&text);
    assert_eq!(count, 3);
    assert!(errors.is_empty(), "{errors:?}");

    let lines: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines[0]["event"], "run_start");
    assert_eq!(lines[1]["case"], "ok");
    assert_eq!(lines[1]["outcome"], "pass");
    assert_eq!(lines[2]["case"], "bad");
    assert_eq!(lines[2]["outcome"], "fail");
    assert_eq!(lines[2]["family"], "format/log");
    assert_eq!(lines[2]["trace_id"], "verify::t1::003");
    assert!(lines[1]["duration_ns"].is_u64());
}

#[test]
fn file_emitter_round_trips_through_validator() {
    let path = std::env::temp_dir().join(format!("tinyfmt-log-{}.jsonl", std::process::id()));
    {
        let mut emitter = LogEmitter::to_file(&path, "verify", "t2").unwrap();
        log_run(&mut emitter);
    }
    let (count, errors) = validate_log_file(&path).unwrap();
    assert_eq!(count, 3);
    assert!(errors.is_empty(), "{errors:?}");
    std::fs::remove_file(&path).ok();
}

#[test]
fn validator_reports_line_numbers() {
    let text = concat!(
        r#"{"timestamp":"t","trace_id":"a::b::1","level":"info","event":"e"}"#,
        "\n\n",
        r#"{"timestamp":"t","trace_id":"a::b::2","level":"info","event":"e","outcome":"maybe","case":"c"}"#,
        "\n",
    );
    let (count, errors) = validate_log_text(text);
    assert_eq!(count, 2);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line_number, 3);
    assert_eq!(errors[0].field, "outcome");
    assert!(errors[0].to_string().starts_with("line 3: field 'outcome'"));
}
