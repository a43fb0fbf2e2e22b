// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The result types that flow between chain steps, decorator calls, and
//! across the three execution modes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The unit of composition between chain steps: the outcome of one shell
/// fragment or action decorator invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// The all-zero result produced by a successful `>>` append, so a
    /// trailing `&& ...` can still run.
    pub fn ok_empty() -> Self {
        Self::default()
    }

    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code,
        }
    }
}

/// Which of the three modes an execution context/decorator call is running
/// in. Dispatch on this tag never changes the parameter schema or validation
/// outcome — only what happens after validation passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    Interpreter,
    Generator,
    Plan,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExecutionMode::Interpreter => "interpreter",
            ExecutionMode::Generator => "generator",
            ExecutionMode::Plan => "plan",
        };
        write!(f, "{s}")
    }
}

/// Mode-typed output of running (or compiling) a command.
#[derive(Debug, Clone)]
pub enum ExecutionData {
    /// Interpreter mode produced no structured value (side effects already
    /// happened), or a string when an action/value decorator result is
    /// queried directly.
    None,
    Text(String),
    Plan(PlanElement),
}

/// `{mode, data, error}` wrapper returned by every context-level entry point.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub mode: ExecutionMode,
    pub data: ExecutionData,
    pub error: Option<String>,
}

impl ExecutionResult {
    pub fn ok(mode: ExecutionMode, data: ExecutionData) -> Self {
        Self {
            mode,
            data,
            error: None,
        }
    }

    pub fn err(mode: ExecutionMode, error: impl Into<String>) -> Self {
        Self {
            mode,
            data: ExecutionData::None,
            error: Some(error.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn text(&self) -> Option<&str> {
        match &self.data {
            ExecutionData::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn plan(&self) -> Option<&PlanElement> {
        match &self.data {
            ExecutionData::Plan(p) => Some(p),
            _ => None,
        }
    }
}

/// The kind of a [`PlanElement`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanElementKind {
    Shell,
    Decorator,
    Conditional,
}

/// A side-effect-free, rooted tree node describing what a run would do.
/// Built bottom-up; pure data; never executes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanElement {
    pub kind: PlanElementKind,
    pub label: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PlanElement>,
}

impl PlanElement {
    pub fn leaf(kind: PlanElementKind, label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            description: description.into(),
            parameters: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_parameters(mut self, parameters: BTreeMap<String, String>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_children(mut self, children: Vec<PlanElement>) -> Self {
        self.children = children;
        self
    }

    /// Render as a minimal indented text tree. This is a diagnostic fallback,
    /// not the full plan pretty-printer (out of scope for this crate).
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        self.render_text_into(0, &mut out);
        out
    }

    fn render_text_into(&self, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        out.push_str(&indent);
        out.push_str(&self.label);
        if !self.description.is_empty() {
            out.push_str(": ");
            out.push_str(&self.description);
        }
        out.push('\n');
        for child in &self.children {
            child.render_text_into(depth + 1, out);
        }
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
