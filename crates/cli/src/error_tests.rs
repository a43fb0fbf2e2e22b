// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn unknown_command_exits_two() {
    let err = CliError::UnknownCommand { name: "missing".to_string() };
    assert_eq!(err.exit_code(), 2);
    assert!(err.to_string().contains("missing"));
}

#[test]
fn execution_failure_exits_one() {
    let err = CliError::ExecutionFailed {
        command: "build".to_string(),
        message: "exit code 1".to_string(),
    };
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn config_parse_failure_exits_two() {
    let source = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
    let err = CliError::ConfigParse {
        path: "cmdforge.toml".to_string(),
        source,
    };
    assert_eq!(err.exit_code(), 2);
}
