// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The shell-fragment compiler's chain parser: turns a list of literal-text
//! and decorator parts into a verified, ordered chain of [`ChainElement`]s.
//!
//! Pure and side-effect-free. Driving the parsed chain through the three
//! execution strategies (interpreter/generator/plan) is the engine's job,
//! not this crate's — this crate only gets the chain structure right.

use crate::error::ChainError;
use crate::span::Span;
use cmdforge_core::{DecoratorRef, ShellPart};
use serde::{Deserialize, Serialize};

/// One of the four shell-style operators that govern control flow between
/// adjacent chain elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainOperator {
    /// `&&` — run next only if `lastResult` succeeded.
    And,
    /// `||` — run next only if `lastResult` failed.
    Or,
    /// `|` — next element's stdin is `lastResult.stdout`.
    Pipe,
    /// `>>` — next element is a filename; append `lastResult.stdout` to it.
    Append,
}

impl ChainOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            ChainOperator::And => "&&",
            ChainOperator::Or => "||",
            ChainOperator::Pipe => "|",
            ChainOperator::Append => ">>",
        }
    }
}

/// A piece of a [`ChainElement::Text`]'s command text: literal source or a
/// value decorator spliced in place.
#[derive(Debug, Clone, PartialEq)]
pub enum TextFragment {
    Literal(String),
    Value(DecoratorRef),
}

/// One element of a parsed chain.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainElement {
    /// A run of literal text and spliced value decorators with no operator
    /// between them — they form one command line.
    Text {
        parts: Vec<TextFragment>,
        is_pipe_target: bool,
        is_file_target: bool,
    },
    /// A standalone action decorator invocation.
    Action {
        decorator: DecoratorRef,
        is_pipe_target: bool,
        is_file_target: bool,
    },
    /// One of the four chain operators.
    Operator { op: ChainOperator, span: Span },
}

impl ChainElement {
    pub fn is_operator(&self) -> bool {
        matches!(self, ChainElement::Operator { .. })
    }

    pub fn is_pipe_target(&self) -> bool {
        match self {
            ChainElement::Text { is_pipe_target, .. } => *is_pipe_target,
            ChainElement::Action { is_pipe_target, .. } => *is_pipe_target,
            ChainElement::Operator { .. } => false,
        }
    }

    pub fn is_file_target(&self) -> bool {
        match self {
            ChainElement::Text { is_file_target, .. } => *is_file_target,
            ChainElement::Action { is_file_target, .. } => *is_file_target,
            ChainElement::Operator { .. } => false,
        }
    }

    fn set_pipe_target(&mut self) {
        match self {
            ChainElement::Text { is_pipe_target, .. } => *is_pipe_target = true,
            ChainElement::Action { is_pipe_target, .. } => *is_pipe_target = true,
            ChainElement::Operator { .. } => {}
        }
    }

    fn set_file_target(&mut self) {
        match self {
            ChainElement::Text { is_file_target, .. } => *is_file_target = true,
            ChainElement::Action { is_file_target, .. } => *is_file_target = true,
            ChainElement::Operator { .. } => {}
        }
    }
}

/// A verified, ordered chain of elements produced from one command's shell
/// content. Construct only via [`parse_chain`] — the invariants are checked
/// there, once, at compile time.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    elements: Vec<ChainElement>,
}

impl Chain {
    pub fn elements(&self) -> &[ChainElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Parse a command's shell content into a [`Chain`], enforcing the
/// structural invariants:
/// - never starts or ends with an operator
/// - never contains two consecutive operators
/// - never contains two consecutive non-operator elements
pub fn parse_chain(parts: &[ShellPart]) -> Result<Chain, ChainError> {
    let mut elements = Vec::new();
    let mut buffer: Vec<TextFragment> = Vec::new();
    let mut offset = 0usize;

    for part in parts {
        match part {
            ShellPart::Literal(text) => {
                scan_literal(text, offset, &mut buffer, &mut elements);
                offset += text.len();
            }
            ShellPart::Value(decorator) => {
                buffer.push(TextFragment::Value(decorator.clone()));
            }
            ShellPart::Action(decorator) => {
                flush_text(&mut buffer, &mut elements);
                elements.push(ChainElement::Action {
                    decorator: decorator.clone(),
                    is_pipe_target: false,
                    is_file_target: false,
                });
            }
        }
    }
    flush_text(&mut buffer, &mut elements);

    if elements.is_empty() {
        return Err(ChainError::Empty);
    }

    annotate_targets(&mut elements);
    check_invariants(&elements)?;

    Ok(Chain { elements })
}

fn flush_text(buffer: &mut Vec<TextFragment>, elements: &mut Vec<ChainElement>) {
    if !buffer.is_empty() {
        elements.push(ChainElement::Text {
            parts: std::mem::take(buffer),
            is_pipe_target: false,
            is_file_target: false,
        });
    }
}

/// Scan one literal-text shell part for the four operators, emitting
/// alternating Text/Operator elements. Quoted regions are skipped so an
/// operator inside `"…"`/`'…'` is treated as ordinary text.
fn scan_literal(
    text: &str,
    base_offset: usize,
    buffer: &mut Vec<TextFragment>,
    elements: &mut Vec<ChainElement>,
) {
    let bytes = text.as_bytes();
    let mut i = 0usize;
    let mut lit_start = 0usize;
    let mut in_single = false;
    let mut in_double = false;

    while i < bytes.len() {
        let b = bytes[i];
        if in_single {
            if b == b'\'' {
                in_single = false;
            }
            i += 1;
            continue;
        }
        if in_double {
            if b == b'"' {
                in_double = false;
            }
            i += 1;
            continue;
        }
        match b {
            b'\'' => {
                in_single = true;
                i += 1;
                continue;
            }
            b'"' => {
                in_double = true;
                i += 1;
                continue;
            }
            _ => {}
        }

        let next = bytes.get(i + 1).copied();
        let op = if b == b'&' && next == Some(b'&') {
            Some((ChainOperator::And, 2usize))
        } else if b == b'|' && next == Some(b'|') {
            Some((ChainOperator::Or, 2))
        } else if b == b'>' && next == Some(b'>') {
            Some((ChainOperator::Append, 2))
        } else if b == b'|' {
            Some((ChainOperator::Pipe, 1))
        } else {
            None
        };

        if let Some((op, len)) = op {
            if i > lit_start {
                buffer.push(TextFragment::Literal(text[lit_start..i].to_string()));
            }
            flush_text(buffer, elements);
            let span = Span::new(base_offset + i, base_offset + i + len);
            elements.push(ChainElement::Operator { op, span });
            i += len;
            lit_start = i;
            continue;
        }

        i += 1;
    }

    if lit_start < bytes.len() {
        buffer.push(TextFragment::Literal(text[lit_start..].to_string()));
    }
}

fn annotate_targets(elements: &mut [ChainElement]) {
    for i in 0..elements.len() {
        let op = match &elements[i] {
            ChainElement::Operator { op, .. } => Some(*op),
            _ => None,
        };
        if let Some(op) = op {
            if let Some(next) = elements.get_mut(i + 1) {
                match op {
                    ChainOperator::Pipe => next.set_pipe_target(),
                    ChainOperator::Append => next.set_file_target(),
                    ChainOperator::And | ChainOperator::Or => {}
                }
            }
        }
    }
}

fn check_invariants(elements: &[ChainElement]) -> Result<(), ChainError> {
    if let ChainElement::Operator { op, span } = &elements[0] {
        return Err(ChainError::LeadingOperator {
            op: op.as_str().to_string(),
            span: *span,
        });
    }
    if let ChainElement::Operator { op, span } = &elements[elements.len() - 1] {
        return Err(ChainError::TrailingOperator {
            op: op.as_str().to_string(),
            span: *span,
        });
    }
    for window in elements.windows(2) {
        let (a, b) = (&window[0], &window[1]);
        match (a, b) {
            (ChainElement::Operator { op: op_a, .. }, ChainElement::Operator { op: op_b, span }) => {
                return Err(ChainError::ConsecutiveOperators {
                    first: op_a.as_str().to_string(),
                    second: op_b.as_str().to_string(),
                    span: *span,
                });
            }
            (a, b) if !a.is_operator() && !b.is_operator() => {
                // Only reachable via two adjacent action decorators with no
                // operator between them; literal-text runs are merged by
                // construction. No source span is tracked for decorator
                // parts, so this falls back to an unlocated span.
                return Err(ChainError::ConsecutiveElements { span: Span::empty(0) });
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "chain_tests.rs"]
mod tests;
