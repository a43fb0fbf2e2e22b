// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn slice_extracts_the_spanned_text() {
    let source = "echo hello";
    let span = Span::new(5, 10);
    assert_eq!(span.slice(source), "hello");
}

#[test]
fn merge_covers_both_spans() {
    let a = Span::new(0, 4);
    let b = Span::new(10, 14);
    assert_eq!(a.merge(b), Span::new(0, 14));
}

#[test]
fn empty_span_has_zero_length() {
    let span = Span::empty(3);
    assert!(span.is_empty());
    assert_eq!(span.len(), 0);
}

#[test]
fn contains_is_half_open() {
    let span = Span::new(2, 5);
    assert!(!span.contains(1));
    assert!(span.contains(2));
    assert!(span.contains(4));
    assert!(!span.contains(5));
}

#[test]
fn locate_span_finds_line_and_column() {
    let source = "echo hello\necho world";
    let span = Span::new(11, 15);
    let (line, col, content) = locate_span(source, span);
    assert_eq!(line, 2);
    assert_eq!(col, 0);
    assert_eq!(content, "echo world");
}

#[test]
fn context_snippet_points_at_the_span() {
    let input = "echo | | bad";
    let span = Span::new(7, 8);
    let snippet = context_snippet(input, span, 20);
    assert!(snippet.contains('^'));
    assert!(snippet.starts_with("echo | | bad"));
}

#[test]
fn diagnostic_context_reports_line_and_column() {
    let source = "echo | | bad";
    let span = Span::new(7, 8);
    let diag = diagnostic_context(source, span, "unexpected token '|'");
    assert!(diag.contains("line 1, column 8"));
    assert!(diag.contains("echo | | bad"));
}
