// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decorator parameter/pattern schema and the centralised, mode-independent
//! validation that runs before any decorator does mode-specific work.
//!
//! Keeping this in `cmdforge-core` (rather than duplicated per decorator)
//! is what guarantees validation errors are identical across interpreter,
//! generator, and plan mode, per the engine's error-handling design.

use crate::content::{NamedParameter, ParamValue, PatternBranch};
use std::collections::HashSet;
use thiserror::Error;

/// Accepted parameter types for decorator parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Identifier,
    String,
    Integer,
    Duration,
    Boolean,
}

impl ParamType {
    fn matches(&self, value: &ParamValue) -> bool {
        use crate::value::Literal;
        match (self, value) {
            (ParamType::Identifier, ParamValue::Identifier(_)) => true,
            (ParamType::String, ParamValue::Literal(Literal::String(_))) => true,
            (ParamType::Integer, ParamValue::Literal(Literal::Integer(_))) => true,
            (ParamType::Duration, ParamValue::Literal(Literal::Duration(_))) => true,
            (ParamType::Boolean, ParamValue::Literal(Literal::Boolean(_))) => true,
            _ => false,
        }
    }
}

/// One parameter a decorator accepts.
#[derive(Debug, Clone)]
pub struct ParamSchema {
    pub name: &'static str,
    pub ty: ParamType,
    pub required: bool,
}

impl ParamSchema {
    pub const fn required(name: &'static str, ty: ParamType) -> Self {
        Self {
            name,
            ty,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, ty: ParamType) -> Self {
        Self {
            name,
            ty,
            required: false,
        }
    }
}

/// Errors raised by schema validation, identical regardless of which mode
/// the decorator is about to run in.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("unknown parameter '{name}'")]
    UnknownParameter { name: String },
    #[error("missing required parameter '{name}'")]
    MissingRequired { name: String },
    #[error("parameter '{name}' has wrong type: expected {expected}")]
    WrongType { name: String, expected: &'static str },
    #[error("too many positional parameters: expected at most {max}, got {got}")]
    TooManyPositional { max: usize, got: usize },
    #[error("unknown pattern branch '{name}'")]
    UnknownPattern { name: String },
    #[error("missing required pattern branch '{name}'")]
    MissingRequiredPattern { name: String },
    #[error("duplicate pattern branch '{name}'")]
    DuplicatePattern { name: String },
}

impl ParamType {
    fn label(self) -> &'static str {
        match self {
            ParamType::Identifier => "identifier",
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Duration => "duration",
            ParamType::Boolean => "boolean",
        }
    }
}

/// Resolve a decorator's named parameters against its schema, matching
/// positional parameters to schema slots left-to-right in declaration order.
///
/// Returns a name -> value map with every required parameter present (and
/// optional ones filled where given) or the first [`SchemaError`] found.
pub fn validate_params(
    schema: &[ParamSchema],
    given: &[NamedParameter],
) -> Result<Vec<(&'static str, ParamValue)>, SchemaError> {
    let mut resolved: Vec<(&'static str, ParamValue)> = Vec::new();
    let mut filled: HashSet<&'static str> = HashSet::new();
    let mut positional_slots = schema.iter().filter(|s| !filled.contains(s.name));

    for param in given {
        if param.is_positional() {
            let slot = positional_slots
                .next()
                .ok_or(SchemaError::TooManyPositional {
                    max: schema.len(),
                    got: given.iter().filter(|p| p.is_positional()).count(),
                })?;
            if !slot.ty.matches(&param.value) {
                return Err(SchemaError::WrongType {
                    name: slot.name.to_string(),
                    expected: slot.ty.label(),
                });
            }
            filled.insert(slot.name);
            resolved.push((slot.name, param.value.clone()));
        } else {
            let slot = schema
                .iter()
                .find(|s| s.name == param.name)
                .ok_or_else(|| SchemaError::UnknownParameter {
                    name: param.name.clone(),
                })?;
            if !slot.ty.matches(&param.value) {
                return Err(SchemaError::WrongType {
                    name: slot.name.to_string(),
                    expected: slot.ty.label(),
                });
            }
            filled.insert(slot.name);
            resolved.push((slot.name, param.value.clone()));
        }
    }

    for slot in schema {
        if slot.required && !filled.contains(slot.name) {
            return Err(SchemaError::MissingRequired {
                name: slot.name.to_string(),
            });
        }
    }

    Ok(resolved)
}

/// The allowed branch names of a pattern decorator.
#[derive(Debug, Clone)]
pub struct PatternSchema {
    /// Fixed branch names the decorator recognises (e.g. `main`/`catch`/`finally`).
    pub allowed: &'static [&'static str],
    /// Subset of `allowed` that must appear at least once.
    pub required: &'static [&'static str],
    /// Whether a `default` wildcard branch is accepted in addition to `allowed`.
    pub allow_default: bool,
    /// Whether arbitrary identifiers (not in `allowed`) are accepted, e.g.
    /// `when`'s branches matching arbitrary variable values.
    pub allow_arbitrary_identifiers: bool,
}

/// Validate a pattern decorator's branch list against its schema.
pub fn validate_pattern(
    schema: &PatternSchema,
    branches: &[PatternBranch],
) -> Result<(), SchemaError> {
    let mut seen: HashSet<&str> = HashSet::new();
    for branch in branches {
        if !seen.insert(branch.pattern.as_str()) {
            return Err(SchemaError::DuplicatePattern {
                name: branch.pattern.clone(),
            });
        }
        let is_known = schema.allowed.contains(&branch.pattern.as_str());
        let is_default = schema.allow_default && branch.is_default();
        if !is_known && !is_default && !schema.allow_arbitrary_identifiers {
            return Err(SchemaError::UnknownPattern {
                name: branch.pattern.clone(),
            });
        }
    }
    for required in schema.required {
        if !branches.iter().any(|b| b.pattern == *required) {
            return Err(SchemaError::MissingRequiredPattern {
                name: required.to_string(),
            });
        }
    }
    Ok(())
}

/// Reject paths containing a `..` traversal segment. Used by decorators
/// that accept a path parameter (e.g. `workdir`) as part of the centralised
/// security-bounds validation pass.
pub fn is_safe_path(path: &str) -> bool {
    !path.split(['/', '\\']).any(|segment| segment == "..")
}

#[cfg(test)]
#[path = "decorator_tests.rs"]
mod tests;
