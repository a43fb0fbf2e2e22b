//! Behavioral specifications for the cmdforge CLI.
//!
//! Black-box: invoke the built binary and check stdout/stderr/exit code
//! against the sample commands `cmdforge-cli::demo` builds in.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use assert_cmd::Command;
use predicates::prelude::*;

fn cmdforge() -> Command {
    Command::cargo_bin("cmdforge").expect("the cmdforge binary should be built by cargo test")
}

#[test]
fn run_executes_a_known_command_and_exits_zero() {
    cmdforge().args(["run", "build"]).assert().success();
}

#[test]
fn run_reports_an_unknown_command_and_exits_nonzero() {
    cmdforge()
        .args(["run", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown command"));
}

#[test]
fn generate_prints_rust_source_to_stdout() {
    cmdforge()
        .args(["generate", "build"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fn build"));
}

#[test]
fn generate_writes_to_a_file_when_out_is_given() {
    let dir = tempfile::tempdir().expect("tempdir creation must succeed in a test sandbox");
    let path = dir.path().join("deploy.rs");

    cmdforge()
        .args(["generate", "deploy", "--out"])
        .arg(&path)
        .assert()
        .success();

    let contents = std::fs::read_to_string(&path).expect("generated file should exist");
    assert!(contents.contains("fn deploy"));
}

#[test]
fn plan_text_renders_an_indented_tree() {
    cmdforge()
        .args(["plan", "test"])
        .assert()
        .success()
        .stdout(predicate::str::contains("parallel"));
}

#[test]
fn plan_json_renders_valid_json() {
    let output = cmdforge().args(["plan", "release", "-o", "json"]).output().expect("command should run");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("plan output should be valid json");
    assert_eq!(value["label"], "when");
}
