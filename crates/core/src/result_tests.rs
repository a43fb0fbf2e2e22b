// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn command_result_success_iff_zero_exit_code() {
    assert!(CommandResult::default().success());
    assert!(CommandResult::failure(1, "boom").success() == false);
}

#[test]
fn ok_empty_is_an_all_zero_result() {
    let r = CommandResult::ok_empty();
    assert!(r.success());
    assert_eq!(r.stdout, "");
    assert_eq!(r.stderr, "");
}

#[test]
fn execution_result_ok_has_no_error() {
    let r = ExecutionResult::ok(ExecutionMode::Interpreter, ExecutionData::None);
    assert!(r.is_ok());
    assert_eq!(r.error, None);
}

#[test]
fn execution_result_err_carries_message() {
    let r = ExecutionResult::err(ExecutionMode::Generator, "boom");
    assert!(!r.is_ok());
    assert_eq!(r.error.as_deref(), Some("boom"));
}

#[test]
fn execution_result_text_accessor() {
    let r = ExecutionResult::ok(
        ExecutionMode::Generator,
        ExecutionData::Text("fn main() {}".to_string()),
    );
    assert_eq!(r.text(), Some("fn main() {}"));
    assert_eq!(r.plan(), None);
}

#[test]
fn plan_element_render_text_indents_children() {
    let root = PlanElement::leaf(PlanElementKind::Decorator, "parallel", "3 children").with_children(vec![
        PlanElement::leaf(PlanElementKind::Shell, "echo a", ""),
        PlanElement::leaf(PlanElementKind::Shell, "echo b", ""),
    ]);
    let text = root.render_text();
    assert_eq!(
        text,
        "parallel: 3 children\n  echo a\n  echo b\n"
    );
}

#[test]
fn execution_mode_display() {
    assert_eq!(ExecutionMode::Interpreter.to_string(), "interpreter");
    assert_eq!(ExecutionMode::Generator.to_string(), "generator");
    assert_eq!(ExecutionMode::Plan.to_string(), "plan");
}
