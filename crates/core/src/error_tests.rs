// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::content::{CommandContent, DecoratorRef, NamedParameter, ShellPart};
use crate::program::Command;

fn cmd_ref(name: &str, target: &str) -> Command {
    Command::new(
        name,
        vec![CommandContent::shell(vec![ShellPart::Action(DecoratorRef::new(
            "cmd",
            vec![NamedParameter::positional(target)],
        ))])],
    )
}

#[test]
fn valid_program_has_no_errors() {
    let program = Program {
        commands: vec![
            cmd_ref("deploy", "build"),
            Command::new("build", vec![]),
        ],
        ..Default::default()
    };
    assert!(validate_program(&program).is_ok());
}

#[test]
fn unknown_command_reference_is_reported() {
    let program = Program {
        commands: vec![cmd_ref("deploy", "missing")],
        ..Default::default()
    };
    let errors = validate_program(&program).unwrap_err();
    assert!(errors.contains(&ModelError::UnknownCommand {
        name: "missing".to_string()
    }));
}

#[test]
fn duplicate_command_is_reported() {
    let program = Program {
        commands: vec![Command::new("build", vec![]), Command::new("build", vec![])],
        ..Default::default()
    };
    let errors = validate_program(&program).unwrap_err();
    assert!(errors.contains(&ModelError::DuplicateCommand {
        name: "build".to_string()
    }));
}

#[test]
fn direct_self_cycle_is_reported() {
    let program = Program {
        commands: vec![cmd_ref("loop", "loop")],
        ..Default::default()
    };
    let errors = validate_program(&program).unwrap_err();
    assert!(errors.contains(&ModelError::CyclicCommandReference {
        name: "loop".to_string()
    }));
}

#[test]
fn transitive_cycle_is_reported() {
    let program = Program {
        commands: vec![cmd_ref("a", "b"), cmd_ref("b", "a")],
        ..Default::default()
    };
    let errors = validate_program(&program).unwrap_err();
    assert!(errors
        .iter()
        .any(|e| matches!(e, ModelError::CyclicCommandReference { .. })));
}
