// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Program, Variable, and Command: the top-level data model produced by the
//! (external) parser. Immutable after parsing.

use crate::content::CommandContent;
use crate::value::Literal;
use std::collections::HashSet;

/// A single `name = value` variable declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub value: Literal,
}

impl Variable {
    pub fn new(name: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A named group of variables, ordered alongside top-level variables in the
/// program's declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct VarGroup {
    pub name: String,
    pub variables: Vec<Variable>,
}

impl VarGroup {
    pub fn new(name: impl Into<String>, variables: Vec<Variable>) -> Self {
        Self {
            name: name.into(),
            variables,
        }
    }
}

/// A named, top-level task: an ordered body of [`CommandContent`].
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub name: String,
    pub doc: Option<String>,
    pub body: Vec<CommandContent>,
}

impl Command {
    pub fn new(name: impl Into<String>, body: Vec<CommandContent>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            body,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Names of commands this command references via the `cmd` value/action
    /// decorator, in first-seen order. Used by the generator to topologically
    /// order emitted entry points.
    pub fn referenced_commands(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        collect_cmd_refs(&self.body, &mut seen, &mut out);
        out
    }
}

fn collect_cmd_refs(body: &[CommandContent], seen: &mut HashSet<String>, out: &mut Vec<String>) {
    use crate::content::ShellPart;

    let mut note = |decorator_name: &str, params: &[crate::content::NamedParameter]| {
        if decorator_name != "cmd" {
            return;
        }
        let referenced = params
            .iter()
            .find(|p| p.is_positional() || p.name == "name")
            .and_then(|p| p.value.as_literal())
            .and_then(Literal::as_str);
        if let Some(name) = referenced {
            if seen.insert(name.to_string()) {
                out.push(name.to_string());
            }
        }
    };

    for item in body {
        match item {
            CommandContent::Shell(parts) => {
                for part in parts {
                    match part {
                        ShellPart::Value(d) | ShellPart::Action(d) => note(&d.name, &d.params),
                        ShellPart::Literal(_) => {}
                    }
                }
            }
            CommandContent::Block { content, .. } => collect_cmd_refs(content, seen, out),
            CommandContent::Pattern { branches, .. } => {
                for branch in branches {
                    collect_cmd_refs(&branch.content, seen, out);
                }
            }
        }
    }
}

/// The full program: ordered variables, var groups, and commands. Command
/// names are unique.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub variables: Vec<Variable>,
    pub var_groups: Vec<VarGroup>,
    pub commands: Vec<Command>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn command(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Validate the unique-names invariant. The parser is expected to enforce
    /// this, but the engine driver re-checks it defensively at the boundary.
    pub fn duplicate_command_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut dups = Vec::new();
        for c in &self.commands {
            if !seen.insert(c.name.clone()) {
                dups.push(c.name.clone());
            }
        }
        dups
    }
}

#[cfg(test)]
#[path = "program_tests.rs"]
mod tests;
