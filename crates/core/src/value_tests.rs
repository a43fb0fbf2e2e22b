// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn string_value_round_trips_as_is() {
    let v: Literal = "hello".into();
    assert_eq!(v.to_value_string(), "hello");
    assert_eq!(v.as_str(), Some("hello"));
}

#[test]
fn integer_value_renders_as_decimal() {
    let v: Literal = 42i64.into();
    assert_eq!(v.to_value_string(), "42");
    assert_eq!(v.as_integer(), Some(42));
}

#[test]
fn boolean_value_renders_as_true_false() {
    let v: Literal = true.into();
    assert_eq!(v.to_value_string(), "true");
    assert_eq!(v.as_boolean(), Some(true));
}

#[test]
fn duration_value_renders_human_readable() {
    let v: Literal = Duration::from_secs(90).into();
    assert_eq!(v.to_value_string(), "1m");
    assert_eq!(v.as_duration(), Some(Duration::from_secs(90)));
}

#[test]
fn wrong_accessor_returns_none() {
    let v: Literal = "hello".into();
    assert_eq!(v.as_integer(), None);
    assert_eq!(v.as_boolean(), None);
    assert_eq!(v.as_duration(), None);
}

#[test]
fn type_name_matches_variant() {
    assert_eq!(Literal::from("x").type_name(), "string");
    assert_eq!(Literal::from(1i64).type_name(), "integer");
    assert_eq!(Literal::from(true).type_name(), "boolean");
    assert_eq!(Literal::from(Duration::from_secs(1)).type_name(), "duration");
}
