//! Integration test: golden fixtures through the runner, report, and CLI.
//!
//! Run: cargo test -p tinyfmt-harness --test fixture_pipeline_test

use std::path::{Path, PathBuf};
use std::process::Command;

use tinyfmt_harness::{
    ConformanceReport, FixtureSet, SinkMode, TestRunner, VerificationSummary, fixtures,
};

fn workspace_root() -> PathBuf {
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest.parent().unwrap().parent().unwrap().to_path_buf()
}

fn fixture_dir() -> PathBuf {
    workspace_root().join("tests/conformance/fixtures")
}

fn load_all() -> Vec<FixtureSet> {
    fixtures::fixture_paths(&fixture_dir())
        .expect("fixture dir should be readable")
        .iter()
        .map(|p| {
            FixtureSet::from_file(p).unwrap_or_else(|e| panic!("{}: {e}", p.display()))
        })
        .collect()
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tinyfmt-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn golden_fixtures_are_well_formed() {
    let sets = load_all();
    assert!(sets.len() >= 2, "expected core and bounded fixture sets");
    let mut names = std::collections::HashSet::new();
    for set in &sets {
        assert_eq!(set.version, "v1");
        assert!(!set.cases.is_empty(), "{} has no cases", set.family);
        for case in &set.cases {
            assert!(names.insert(case.name.clone()), "duplicate case {}", case.name);
            assert!(case.sink_mode().is_ok(), "{}: bad sink", case.name);
            assert!(case.expected_count.is_some(), "{}: count not pinned", case.name);
        }
    }
}

#[test]
fn golden_fixtures_all_pass() {
    let runner = TestRunner::new("golden");
    let results: Vec<_> = load_all().iter().flat_map(|set| runner.run(set)).collect();
    let summary = VerificationSummary::from_results(results);
    let failures: Vec<String> = summary
        .failures()
        .map(|r| format!("{}\n{}", r.case_name, r.diff.as_deref().unwrap_or("")))
        .collect();
    assert!(summary.all_passed(), "failures:\n{}", failures.join("\n"));
    assert!(summary.total >= 50);
}

#[test]
fn bounded_cases_cover_the_edges() {
    let capacities: Vec<usize> = load_all()
        .iter()
        .flat_map(|set| set.cases.iter())
        .filter_map(|case| match case.sink_mode() {
            Ok(SinkMode::Bounded { capacity }) => Some(capacity),
            _ => None,
        })
        .collect();
    assert!(capacities.contains(&0));
    assert!(capacities.contains(&1));
}

#[test]
fn fixture_set_survives_reserialization() {
    for set in load_all() {
        let json = set.to_json().unwrap();
        let again = FixtureSet::from_json(&json).unwrap();
        assert_eq!(again.cases.len(), set.cases.len());
        let a = TestRunner::new("a").run(&set);
        let b = TestRunner::new("b").run(&again);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.actual, y.actual, "{}", x.case_name);
        }
    }
}

#[test]
fn report_renders_for_golden_run() {
    let sets = load_all();
    let runner = TestRunner::new("golden");
    let results = sets.iter().flat_map(|s| runner.run(s)).collect();
    let report = ConformanceReport {
        title: String::from("tinyfmt Conformance Report"),
        families: sets.iter().map(|s| s.family.clone()).collect(),
        timestamp: String::from("2026-10-19T00:00:00.000Z"),
        summary: VerificationSummary::from_results(results),
    };
    let md = report.to_markdown();
    assert!(md.contains("| precision_beats_zero | precision | PASS |"));
    assert!(!md.contains("## Failures"));
    let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
    assert_eq!(json["summary"]["failed"], 0);
}

fn harness_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tinyfmt-harness"))
}

#[test]
fn cli_verify_writes_report_and_valid_log() {
    let out = scratch_dir("verify");
    let report = out.join("report.md");
    let log = out.join("run.jsonl");
    let output = harness_bin()
        .args(["verify", "--fixture"])
        .arg(fixture_dir())
        .arg("--report")
        .arg(&report)
        .arg("--log")
        .arg(&log)
        .env_remove("TINYFMT_FIXTURE_DIR")
        .output()
        .expect("harness binary should run");
    assert!(
        output.status.success(),
        "verify failed:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(report.exists());
    assert!(report.with_extension("json").exists());

    let (lines, errors) = tinyfmt_harness::structured_log::validate_log_file(&log).unwrap();
    assert!(errors.is_empty(), "{errors:?}");
    // run_start + one line per case + run_end
    assert!(lines > 50);
    let text = std::fs::read_to_string(&log).unwrap();
    for line in text.lines() {
        let entry: serde_json::Value = serde_json::from_str(line).unwrap();
        let trace_id = entry["trace_id"].as_str().unwrap();
        assert!(trace_id.starts_with("fixture-verify::"), "{trace_id}");
    }

    let status = harness_bin()
        .arg("validate-log")
        .arg(&log)
        .status()
        .unwrap();
    assert!(status.success());
}

#[test]
fn cli_verify_fails_on_mismatch() {
    let dir = scratch_dir("mismatch");
    std::fs::write(
        dir.join("broken.json"),
        r#"{"version":"v1","family":"broken","captured_at":"","cases":[
            {"name":"wrong","section":"precision","format":"%05.3d","args":[{"int":7}],"expected_output":"007"}]}"#,
    )
    .unwrap();
    let output = harness_bin()
        .args(["verify", "--fixture"])
        .arg(&dir)
        .env_remove("TINYFMT_REPORT")
        .env_remove("TINYFMT_LOG")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("FAIL wrong"), "{stderr}");
}

#[test]
fn cli_verify_reads_fixture_dir_from_env() {
    let output = harness_bin()
        .arg("verify")
        .env("TINYFMT_FIXTURE_DIR", fixture_dir())
        .env_remove("TINYFMT_REPORT")
        .env_remove("TINYFMT_LOG")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn cli_render_prints_formatted_line() {
    let output = harness_bin()
        .args(["render", "[%-6s|%#06x|%d]", "str:ab", "uint:0x1f", "int:-3"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "[ab    |0x001f|-3]\n");
    assert!(String::from_utf8_lossy(&output.stderr).contains("count=18"));
}

#[test]
fn cli_render_bounded_reports_full_count() {
    let output = harness_bin()
        .args(["render", "--sink", "bounded:4", "%s", "str:abcdef"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "abc\n");
    assert!(String::from_utf8_lossy(&output.stderr).contains("count=6"));
}

#[test]
fn cli_render_rejects_bad_argument() {
    let output = harness_bin()
        .args(["render", "%d", "float:1.5"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn fixture_paths_skip_non_json() {
    let dir = scratch_dir("paths");
    std::fs::write(dir.join("b.json"), "{}").unwrap();
    std::fs::write(dir.join("a.json"), "{}").unwrap();
    std::fs::write(dir.join("notes.txt"), "").unwrap();
    let paths = fixtures::fixture_paths(&dir).unwrap();
    let names: Vec<&str> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap())
        .collect();
    assert_eq!(names, ["a.json", "b.json"]);
    assert!(fixtures::fixture_paths(Path::new("/nonexistent/tinyfmt")).is_err());
}
