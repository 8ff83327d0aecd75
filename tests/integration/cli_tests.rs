//! Binary tests: run `pumpctl --simulate ...` in a scratch working directory.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use std::time::{Duration, Instant};

use pumpctl::app::report::OperationResult;

struct Run {
    code: i32,
    result: OperationResult,
    stdout_lines: usize,
}

fn pumpctl(dir: &Path, args: &[&str]) -> Run {
    let output: Output = Command::new(env!("CARGO_BIN_EXE_pumpctl"))
        .current_dir(dir)
        .arg("--simulate")
        .args(args)
        .env("RUST_LOG", "debug")
        .output()
        .expect("spawn pumpctl");
    let stdout = String::from_utf8(output.stdout).expect("utf-8 stdout");
    let last = stdout.lines().last().unwrap_or_default();
    let result: OperationResult = serde_json::from_str(last)
        .unwrap_or_else(|e| panic!("result line {last:?} is not JSON: {e}"));
    Run {
        code: output.status.code().expect("exit code"),
        result,
        stdout_lines: stdout.lines().count(),
    }
}

fn with_config(body: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("data")).unwrap();
    fs::write(dir.path().join("data/pump-config.json"), body).unwrap();
    dir
}

#[test]
fn setup_with_config_succeeds() {
    let dir = with_config(r#"[{"pin": 17}, {"pin": 27}]"#);
    let run = pumpctl(dir.path(), &["setup"]);
    assert_eq!(run.code, 0);
    assert!(run.result.success);
    assert!(run.result.message.unwrap().contains("2 configured pin(s)"));
}

#[test]
fn setup_without_config_uses_default_pins() {
    let dir = tempfile::tempdir().unwrap();
    let run = pumpctl(dir.path(), &["setup"]);
    assert_eq!(run.code, 0);
    assert!(run.result.message.unwrap().contains("27 default pin(s)"));
}

#[test]
fn setup_truncated_config_fails_cleanly() {
    let dir = with_config(r#"[{"pin": 17}, {"pi"#);
    let run = pumpctl(dir.path(), &["setup"]);
    assert_eq!(run.code, 1);
    assert!(!run.result.success);
    assert!(run.result.error.is_some());
}

#[test]
fn explicit_config_path_is_honoured() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pumps.json");
    fs::write(&path, r#"[{"pin": 5}]"#).unwrap();
    let run = pumpctl(dir.path(), &["setup", "--config", path.to_str().unwrap()]);
    assert_eq!(run.code, 0);
    assert!(run.result.message.unwrap().contains("1 configured pin(s)"));
}

#[test]
fn activate_missing_duration_reports_usage() {
    let dir = tempfile::tempdir().unwrap();
    let run = pumpctl(dir.path(), &["activate", "5"]);
    assert_eq!(run.code, 1);
    assert!(!run.result.success);
    assert!(run.result.error.unwrap().to_lowercase().contains("usage"));
}

#[test]
fn activate_non_integer_pin_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let run = pumpctl(dir.path(), &["activate", "foo", "100"]);
    assert_eq!(run.code, 1);
    assert!(run.result.error.unwrap().contains("invalid parameters"));
}

#[test]
fn unknown_command_is_named() {
    let dir = tempfile::tempdir().unwrap();
    let run = pumpctl(dir.path(), &["frobnicate"]);
    assert_eq!(run.code, 1);
    assert!(run.result.error.unwrap().contains("frobnicate"));
}

#[test]
fn help_word_is_an_unknown_command() {
    let dir = tempfile::tempdir().unwrap();
    let run = pumpctl(dir.path(), &["help"]);
    assert_eq!(run.code, 1);
    assert_eq!(run.stdout_lines, 1);
    assert_eq!(run.result.error.as_deref(), Some("unknown command: help"));
}

#[test]
fn missing_command_fails() {
    let dir = tempfile::tempdir().unwrap();
    let run = pumpctl(dir.path(), &[]);
    assert_eq!(run.code, 1);
    assert!(!run.result.success);
}

#[test]
fn activate_pulses_and_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let run = pumpctl(dir.path(), &["activate", "17", "20"]);
    assert_eq!(run.code, 0);
    assert!(run.result.success);
}

#[test]
fn activate_negative_duration_returns_promptly() {
    let dir = tempfile::tempdir().unwrap();
    let start = Instant::now();
    let run = pumpctl(dir.path(), &["activate", "17", "-60000"]);
    assert_eq!(run.code, 0);
    assert!(start.elapsed() < Duration::from_secs(3));
}

#[test]
fn cleanup_succeeds_repeatedly() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(pumpctl(dir.path(), &["cleanup"]).code, 0);
    assert_eq!(pumpctl(dir.path(), &["cleanup"]).code, 0);
}

#[test]
fn stdout_carries_only_the_result_line() {
    let dir = with_config(r#"[{"pin": 17}]"#);
    let run = pumpctl(dir.path(), &["setup"]);
    assert_eq!(run.stdout_lines, 1);
}

#[test]
fn dispense_uses_configured_flow_rate() {
    let dir = with_config(r#"[{"id": 1, "pin": 17, "ingredient": "vodka", "flowRate": 1000.0}]"#);
    let run = pumpctl(dir.path(), &["dispense", "vodka", "20"]);
    assert_eq!(run.code, 0, "{:?}", run.result);
    assert!(run.result.message.unwrap().contains("20 ms"));
}

#[test]
fn dispense_unknown_ingredient_fails() {
    let dir = with_config(r#"[{"id": 1, "pin": 17, "ingredient": "vodka", "flowRate": 25.0}]"#);
    let run = pumpctl(dir.path(), &["dispense", "absinthe", "20"]);
    assert_eq!(run.code, 1);
    assert!(run.result.error.unwrap().contains("absinthe"));
}
