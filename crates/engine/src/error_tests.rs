// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use cmdforge_core::SchemaError;

#[test]
fn validation_error_wraps_with_decorator_name() {
    let err = DecoratorError::validation(
        "timeout",
        SchemaError::MissingRequired {
            name: "duration".to_string(),
        },
    );
    assert_eq!(
        err.to_string(),
        "timeout validation failed: missing required parameter 'duration'"
    );
}

#[test]
fn aggregate_joins_children_with_semicolons() {
    let err = DecoratorError::aggregate(vec!["a failed".to_string(), "b failed".to_string()]);
    assert_eq!(err.to_string(), "parallel execution failed: a failed; b failed");
}

#[test]
fn execution_error_carries_decorator_and_message() {
    let err = DecoratorError::execution("cmd", "exit code 1");
    assert_eq!(err.to_string(), "cmd execution failed: exit code 1");
}
