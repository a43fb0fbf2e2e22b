// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::content::{DecoratorRef, NamedParameter, ShellPart};

#[test]
fn command_lookup_by_name() {
    let program = Program {
        commands: vec![Command::new("build", vec![])],
        ..Default::default()
    };
    assert!(program.command("build").is_some());
    assert!(program.command("missing").is_none());
}

#[test]
fn duplicate_command_names_detects_repeats() {
    let program = Program {
        commands: vec![
            Command::new("build", vec![]),
            Command::new("build", vec![]),
            Command::new("test", vec![]),
        ],
        ..Default::default()
    };
    assert_eq!(program.duplicate_command_names(), vec!["build".to_string()]);
}

#[test]
fn duplicate_command_names_empty_when_unique() {
    let program = Program {
        commands: vec![Command::new("build", vec![]), Command::new("test", vec![])],
        ..Default::default()
    };
    assert!(program.duplicate_command_names().is_empty());
}

#[test]
fn referenced_commands_collects_cmd_decorator_targets() {
    let cmd = Command::new(
        "deploy",
        vec![CommandContent::shell(vec![
            ShellPart::Literal("echo before && ".to_string()),
            ShellPart::Action(DecoratorRef::new(
                "cmd",
                vec![NamedParameter::positional("build")],
            )),
        ])],
    );
    assert_eq!(cmd.referenced_commands(), vec!["build".to_string()]);
}

#[test]
fn referenced_commands_deduplicates_and_recurses_into_blocks() {
    let inner = CommandContent::block(
        "retry",
        vec![NamedParameter::named("attempts", 3i64)],
        vec![CommandContent::shell(vec![ShellPart::Action(
            DecoratorRef::new("cmd", vec![NamedParameter::positional("build")]),
        )])],
    );
    let cmd = Command::new(
        "deploy",
        vec![
            CommandContent::shell(vec![ShellPart::Action(DecoratorRef::new(
                "cmd",
                vec![NamedParameter::positional("build")],
            ))]),
            inner,
        ],
    );
    assert_eq!(cmd.referenced_commands(), vec!["build".to_string()]);
}

#[test]
fn referenced_commands_empty_when_no_cmd_decorator() {
    let cmd = Command::new(
        "build",
        vec![CommandContent::shell(vec![ShellPart::Literal(
            "echo hi".to_string(),
        )])],
    );
    assert!(cmd.referenced_commands().is_empty());
}
