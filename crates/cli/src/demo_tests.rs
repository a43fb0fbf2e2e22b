// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use cmdforge_core::{CapturedEnvironment, ExecutionMode};
use cmdforge_engine::EngineDriver;

fn env() -> CapturedEnvironment {
    CapturedEnvironment::from_map(Default::default())
}

#[test]
fn sample_program_has_no_duplicate_or_dangling_command_names() {
    let program = sample_program();
    assert!(program.duplicate_command_names().is_empty());
    assert!(cmdforge_core::validate_program(&program).is_ok());
}

#[test]
fn pipeline_and_conjunction_runs_in_interpreter_mode() {
    let program = sample_program();
    let driver = EngineDriver::new(&program, env());
    let result = driver.run_command("build", ExecutionMode::Interpreter);
    assert!(result.is_ok());
}

#[test]
fn cross_command_reference_dispatches_build() {
    let program = sample_program();
    let driver = EngineDriver::new(&program, env());
    let result = driver.run_command("deploy", ExecutionMode::Interpreter);
    assert!(result.is_ok());
}

#[test]
fn conditional_release_selects_staging_branch_from_seeded_variable() {
    let program = sample_program();
    let driver = EngineDriver::new(&program, env());
    let result = driver.run_command("release", ExecutionMode::Interpreter);
    assert!(result.is_ok());
    assert!(result.text().unwrap().contains("staging"));
}

#[test]
fn variable_splice_reports_seeded_version() {
    let program = sample_program();
    let mut vars = std::collections::HashMap::new();
    vars.insert("HOME".to_string(), "/home/demo".to_string());
    let driver = EngineDriver::new(&program, CapturedEnvironment::from_map(vars));
    let result = driver.run_command("announce", ExecutionMode::Interpreter);
    assert!(result.is_ok());
    assert!(result.text().unwrap().contains("1.4.0"));
}

#[test]
fn every_sample_command_produces_a_plan() {
    let program = sample_program();
    let driver = EngineDriver::new(&program, env());
    for command in &program.commands {
        let result = driver.run_command(&command.name, ExecutionMode::Plan);
        assert!(result.is_ok(), "{} should plan cleanly", command.name);
        assert!(result.plan().is_some());
    }
}

#[test]
fn every_sample_command_generates_rust_source() {
    let program = sample_program();
    let driver = EngineDriver::new(&program, env());
    for command in &program.commands {
        let result = driver.run_command(&command.name, ExecutionMode::Generator);
        assert!(result.is_ok(), "{} should generate cleanly", command.name);
        assert!(result.text().is_some());
    }
}
