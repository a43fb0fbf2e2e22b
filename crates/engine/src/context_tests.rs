// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use cmdforge_core::ExecutionMode;

fn env() -> CapturedEnvironment {
    CapturedEnvironment::from_map(Default::default())
}

#[test]
fn interpreter_context_reports_its_mode() {
    let ctx = InterpreterContext::new(env());
    assert_eq!(ctx.mode(), ExecutionMode::Interpreter);
}

#[test]
fn set_then_get_variable_round_trips() {
    let mut ctx = InterpreterContext::new(env());
    ctx.set_variable("name", "alice");
    assert_eq!(ctx.get_variable("name"), Some("alice".to_string()));
    assert_eq!(ctx.get_variable("missing"), None);
}

#[test]
fn with_working_dir_does_not_mutate_original() {
    let ctx = InterpreterContext::new(env());
    let derived = ctx.with_working_dir("/tmp/build");
    assert_eq!(ctx.working_dir(), None);
    assert_eq!(derived.working_dir(), Some(Path::new("/tmp/build")));
}

#[test]
fn child_copies_variables_but_mutations_stay_local() {
    let mut ctx = InterpreterContext::new(env());
    ctx.set_variable("x", "1");
    let mut child = ctx.child(1);
    assert_eq!(child.get_variable("x"), Some("1".to_string()));
    child.set_variable("x", "2");
    assert_eq!(ctx.get_variable("x"), Some("1".to_string()));
}

#[test]
fn child_shell_counter_is_offset_by_stride() {
    let ctx = InterpreterContext::new(env());
    assert_eq!(ctx.next_shell_id(), 0);
    assert_eq!(ctx.next_shell_id(), 1);
    let child_a = ctx.child(1);
    let child_b = ctx.child(2);
    assert_eq!(child_a.next_shell_id(), 2 + CHILD_COUNTER_STRIDE);
    assert_eq!(child_b.next_shell_id(), 2 + 2 * CHILD_COUNTER_STRIDE);
}

#[test]
fn with_cancel_is_independent_of_parent() {
    let ctx = InterpreterContext::new(env());
    let (derived, token) = ctx.with_cancel();
    token.cancel();
    assert!(derived.cancel_token().is_cancelled());
    assert!(!ctx.cancel_token().is_cancelled());
}

#[test]
fn with_timeout_cancels_after_duration() {
    let ctx = InterpreterContext::new(env());
    let (derived, _token) = ctx.with_timeout(Duration::from_millis(5));
    assert!(!derived.cancel_token().is_cancelled());
    std::thread::sleep(Duration::from_millis(50));
    assert!(derived.cancel_token().is_cancelled());
}

#[test]
fn generator_context_tracks_imports_and_env_usage() {
    let ctx = GeneratorContext::new(env());
    ctx.record_import("std::process::Command");
    ctx.record_import("std::process::Command");
    ctx.record_env_usage("PATH");
    assert_eq!(ctx.imports(), vec!["std::process::Command".to_string()]);
    assert_eq!(ctx.env_vars_needed(), vec!["PATH".to_string()]);
}

#[test]
fn generator_child_inherits_recorded_imports() {
    let ctx = GeneratorContext::new(env());
    ctx.record_import("foo");
    let child = ctx.child(1);
    assert_eq!(child.imports(), vec!["foo".to_string()]);
}

#[test]
fn plan_context_reports_its_mode() {
    let ctx = PlanContext::new(env());
    assert_eq!(ctx.mode(), ExecutionMode::Plan);
}
