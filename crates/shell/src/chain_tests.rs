// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use cmdforge_core::NamedParameter;

fn lit(s: &str) -> ShellPart {
    ShellPart::Literal(s.to_string())
}

fn action(name: &str) -> ShellPart {
    ShellPart::Action(DecoratorRef::new(name, vec![NamedParameter::positional("build")]))
}

#[test]
fn pipe_and_conjunction() {
    let chain = parse_chain(&[lit("echo hello | grep hello && echo found")]).unwrap();
    let kinds: Vec<&str> = chain
        .elements()
        .iter()
        .map(|e| match e {
            ChainElement::Text { .. } => "text",
            ChainElement::Action { .. } => "action",
            ChainElement::Operator { op, .. } => op.as_str(),
        })
        .collect();
    assert_eq!(kinds, vec!["text", "|", "text", "&&", "text"]);
    assert!(chain.elements()[2].is_pipe_target());
}

#[test]
fn append_marks_file_target() {
    let chain = parse_chain(&[lit("echo hi >> out.log")]).unwrap();
    assert!(chain.elements()[2].is_file_target());
}

#[test]
fn value_decorator_is_spliced_into_surrounding_text() {
    let parts = vec![
        ShellPart::Literal("echo ".to_string()),
        ShellPart::Value(DecoratorRef::new("var", vec![NamedParameter::positional("name")])),
        ShellPart::Literal(" && echo done".to_string()),
    ];
    let chain = parse_chain(&parts).unwrap();
    match &chain.elements()[0] {
        ChainElement::Text { parts, .. } => assert_eq!(parts.len(), 2),
        other => panic!("expected text element, got {other:?}"),
    }
}

#[test]
fn action_decorator_is_a_standalone_element() {
    let chain = parse_chain(&[lit("echo before && "), action("cmd")]).unwrap();
    assert!(matches!(chain.elements().last(), Some(ChainElement::Action { .. })));
}

#[test]
fn operator_inside_double_quotes_is_not_split() {
    let chain = parse_chain(&[lit("echo \"a && b\"")]).unwrap();
    assert_eq!(chain.len(), 1);
}

#[test]
fn operator_inside_single_quotes_is_not_split() {
    let chain = parse_chain(&[lit("echo 'a || b'")]).unwrap();
    assert_eq!(chain.len(), 1);
}

#[test]
fn leading_operator_is_rejected() {
    let err = parse_chain(&[lit("&& echo hi")]).unwrap_err();
    assert!(matches!(err, ChainError::LeadingOperator { .. }));
}

#[test]
fn trailing_operator_is_rejected() {
    let err = parse_chain(&[lit("echo hi ||")]).unwrap_err();
    assert!(matches!(err, ChainError::TrailingOperator { .. }));
}

#[test]
fn consecutive_operators_are_rejected() {
    let err = parse_chain(&[lit("echo hi && || echo bye")]).unwrap_err();
    assert!(matches!(err, ChainError::ConsecutiveOperators { .. }));
}

#[test]
fn consecutive_actions_with_no_operator_are_rejected() {
    let err = parse_chain(&[action("build"), action("test")]).unwrap_err();
    assert!(matches!(err, ChainError::ConsecutiveElements { .. }));
}

#[test]
fn empty_chain_is_rejected() {
    let err = parse_chain(&[]).unwrap_err();
    assert_eq!(err, ChainError::Empty);
}

#[test]
fn short_circuit_false_and_echo_never_still_parses_as_one_chain() {
    let chain = parse_chain(&[lit("false && echo never")]).unwrap();
    assert_eq!(chain.len(), 3);
}
