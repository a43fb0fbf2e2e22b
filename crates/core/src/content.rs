// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-body content: the sum type a command's body is made of, as
//! produced by the (external) parser.

use crate::value::Literal;

/// One piece of a shell fragment: literal text, a value decorator, or an
/// action decorator. Produced by the parser; consumed by the shell-fragment
/// compiler.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellPart {
    /// Literal shell text, possibly containing the `&&`/`||`/`|`/`>>` operators
    /// which the compiler scans for.
    Literal(String),
    /// A value decorator reference, e.g. `@var(name)`, spliced into the
    /// surrounding text once expanded.
    Value(DecoratorRef),
    /// An action decorator reference, e.g. `@cmd(build)`, forming a standalone
    /// chain step.
    Action(DecoratorRef),
}

/// A decorator invocation: name plus its (unresolved) named parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoratorRef {
    pub name: String,
    pub params: Vec<NamedParameter>,
}

impl DecoratorRef {
    pub fn new(name: impl Into<String>, params: Vec<NamedParameter>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    pub fn param(&self, name: &str) -> Option<&NamedParameter> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// A decorator parameter. `name` is empty for a positional parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedParameter {
    pub name: String,
    pub value: ParamValue,
}

impl NamedParameter {
    pub fn named(name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn positional(value: impl Into<ParamValue>) -> Self {
        Self {
            name: String::new(),
            value: value.into(),
        }
    }

    pub fn is_positional(&self) -> bool {
        self.name.is_empty()
    }
}

/// A parameter's value: either a literal or a bare identifier (e.g. a
/// variable reference used without quoting).
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Literal(Literal),
    Identifier(String),
}

impl ParamValue {
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            ParamValue::Literal(l) => Some(l),
            ParamValue::Identifier(_) => None,
        }
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            ParamValue::Identifier(s) => Some(s),
            ParamValue::Literal(_) => None,
        }
    }
}

impl From<Literal> for ParamValue {
    fn from(l: Literal) -> Self {
        ParamValue::Literal(l)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Literal(Literal::String(s.to_string()))
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Literal(Literal::Integer(n))
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Literal(Literal::Boolean(b))
    }
}

impl From<std::time::Duration> for ParamValue {
    fn from(d: std::time::Duration) -> Self {
        ParamValue::Literal(Literal::Duration(d))
    }
}

/// One branch of a pattern decorator: the matched pattern (an identifier or
/// the `default` wildcard) and its inner content.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternBranch {
    pub pattern: String,
    pub content: Vec<CommandContent>,
}

impl PatternBranch {
    pub fn new(pattern: impl Into<String>, content: Vec<CommandContent>) -> Self {
        Self {
            pattern: pattern.into(),
            content,
        }
    }

    pub fn is_default(&self) -> bool {
        self.pattern == "default"
    }
}

/// One element of a command body.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandContent {
    /// A shell fragment: literal text interleaved with value/action decorators.
    Shell(Vec<ShellPart>),
    /// A block decorator wrapping a nested sequence of content.
    Block {
        name: String,
        params: Vec<NamedParameter>,
        content: Vec<CommandContent>,
    },
    /// A pattern decorator wrapping a list of branches.
    Pattern {
        name: String,
        params: Vec<NamedParameter>,
        branches: Vec<PatternBranch>,
    },
}

impl CommandContent {
    pub fn shell(parts: Vec<ShellPart>) -> Self {
        CommandContent::Shell(parts)
    }

    pub fn block(
        name: impl Into<String>,
        params: Vec<NamedParameter>,
        content: Vec<CommandContent>,
    ) -> Self {
        CommandContent::Block {
            name: name.into(),
            params,
            content,
        }
    }

    pub fn pattern(
        name: impl Into<String>,
        params: Vec<NamedParameter>,
        branches: Vec<PatternBranch>,
    ) -> Self {
        CommandContent::Pattern {
            name: name.into(),
            params,
            branches,
        }
    }
}

#[cfg(test)]
#[path = "content_tests.rs"]
mod tests;
