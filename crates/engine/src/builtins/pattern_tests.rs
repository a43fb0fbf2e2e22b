// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use cmdforge_core::{CapturedEnvironment, CommandContent, CommandResult};
use std::sync::atomic::{AtomicUsize, Ordering};

fn env() -> CapturedEnvironment {
    CapturedEnvironment::from_map(Default::default())
}

struct LabelingRunner;

impl InterpreterRunner for LabelingRunner {
    fn run(&self, _ctx: &mut InterpreterContext, content: &[CommandContent]) -> Result<CommandResult, DecoratorError> {
        let _ = content;
        Ok(CommandResult::ok_empty())
    }
}

impl GeneratorRunner for LabelingRunner {
    fn run(&self, _ctx: &GeneratorContext, _content: &[CommandContent]) -> Result<String, DecoratorError> {
        Ok("noop();".to_string())
    }
}

impl PlanRunner for LabelingRunner {
    fn run(&self, _ctx: &PlanContext, _content: &[CommandContent]) -> Result<PlanElement, DecoratorError> {
        Ok(PlanElement::leaf(PlanElementKind::Shell, "noop", ""))
    }
}

struct FailingRunner {
    calls: AtomicUsize,
}

impl InterpreterRunner for FailingRunner {
    fn run(&self, _ctx: &mut InterpreterContext, content: &[CommandContent]) -> Result<CommandResult, DecoratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(DecoratorError::execution("boom", content.len().to_string()))
    }
}

fn branch(pattern: &str) -> PatternBranch {
    PatternBranch::new(pattern, vec![CommandContent::shell(vec![])])
}

#[test]
fn when_selects_the_matching_branch() {
    let mut ctx = InterpreterContext::new(env());
    ctx.set_variable("stage", "prod");
    let params = [NamedParameter::named("variable", cmdforge_core::ParamValue::Identifier("stage".into()))];
    let branches = [branch("prod"), branch("dev")];
    let result = When.execute_interpreter(&mut ctx, &params, &branches, &LabelingRunner);
    assert!(result.is_ok());
}

#[test]
fn when_falls_back_to_default_branch() {
    let mut ctx = InterpreterContext::new(env());
    ctx.set_variable("stage", "staging");
    let params = [NamedParameter::named("variable", cmdforge_core::ParamValue::Identifier("stage".into()))];
    let branches = [branch("prod"), branch("default")];
    let result = When.execute_interpreter(&mut ctx, &params, &branches, &LabelingRunner);
    assert!(result.is_ok());
}

#[test]
fn when_errors_when_variable_is_undefined() {
    let mut ctx = InterpreterContext::new(env());
    let params = [NamedParameter::named("variable", cmdforge_core::ParamValue::Identifier("stage".into()))];
    let branches = [branch("prod")];
    let err = When.execute_interpreter(&mut ctx, &params, &branches, &LabelingRunner).unwrap_err();
    assert!(matches!(err, DecoratorError::Reference { .. }));
}

#[test]
fn when_errors_when_nothing_matches_and_no_default() {
    let mut ctx = InterpreterContext::new(env());
    ctx.set_variable("stage", "qa");
    let params = [NamedParameter::named("variable", cmdforge_core::ParamValue::Identifier("stage".into()))];
    let branches = [branch("prod"), branch("dev")];
    let err = When.execute_interpreter(&mut ctx, &params, &branches, &LabelingRunner).unwrap_err();
    assert!(matches!(err, DecoratorError::Execution { .. }));
}

#[test]
fn when_plan_marks_the_selected_branch() {
    let mut ctx = PlanContext::new(env());
    ctx.set_variable("stage", "dev");
    let params = [NamedParameter::named("variable", cmdforge_core::ParamValue::Identifier("stage".into()))];
    let branches = [branch("prod"), branch("dev")];
    let plan = When.execute_plan(&ctx, &params, &branches, &LabelingRunner).unwrap();
    assert_eq!(plan.parameters.get("selectedBranch"), Some(&"dev".to_string()));
    assert_eq!(plan.children[1].parameters.get("selected"), Some(&"true".to_string()));
    assert_eq!(plan.children[0].parameters.get("selected"), Some(&"false".to_string()));
}

#[test]
fn try_runs_catch_on_main_failure_but_still_reports_mains_error() {
    let mut ctx = InterpreterContext::new(env());
    let branches = [branch("main"), branch("catch")];
    let runner = FailingRunner { calls: AtomicUsize::new(0) };
    let err = Try.execute_interpreter(&mut ctx, &[], &branches, &runner).unwrap_err();
    assert!(matches!(err, DecoratorError::Execution { .. }));
    assert_eq!(runner.calls.load(Ordering::SeqCst), 2);
}

struct FailingResultRunner {
    calls: AtomicUsize,
}

impl InterpreterRunner for FailingResultRunner {
    fn run(&self, _ctx: &mut InterpreterContext, _content: &[CommandContent]) -> Result<CommandResult, DecoratorError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call == 0 {
            Ok(CommandResult {
                stdout: String::new(),
                stderr: String::new(),
                exit_code: 1,
            })
        } else {
            Ok(CommandResult::ok_empty())
        }
    }
}

#[test]
fn try_runs_catch_when_main_returns_a_nonzero_exit_without_erroring() {
    let mut ctx = InterpreterContext::new(env());
    let branches = [branch("main"), branch("catch")];
    let runner = FailingResultRunner { calls: AtomicUsize::new(0) };
    let err = Try.execute_interpreter(&mut ctx, &[], &branches, &runner).unwrap_err();
    assert!(matches!(err, DecoratorError::Execution { .. }));
    assert_eq!(runner.calls.load(Ordering::SeqCst), 2, "catch should have run alongside main");
}

#[test]
fn try_succeeds_when_main_and_finally_both_succeed() {
    let mut ctx = InterpreterContext::new(env());
    let branches = [branch("main"), branch("finally")];
    let result = Try.execute_interpreter(&mut ctx, &[], &branches, &LabelingRunner);
    assert!(result.is_ok());
}

#[test]
fn try_rejects_a_pattern_list_missing_catch_and_finally() {
    let mut ctx = InterpreterContext::new(env());
    let branches = [branch("main")];
    let err = Try.execute_interpreter(&mut ctx, &[], &branches, &LabelingRunner).unwrap_err();
    assert!(matches!(err, DecoratorError::Execution { .. }));
}

#[test]
fn try_plan_lists_every_present_branch_as_a_child() {
    let ctx = PlanContext::new(env());
    let branches = [branch("main"), branch("catch"), branch("finally")];
    let plan = Try.execute_plan(&ctx, &[], &branches, &LabelingRunner).unwrap();
    assert_eq!(plan.children.len(), 3);
}
