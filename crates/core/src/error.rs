// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reference-validation errors over a [`crate::program::Program`]: the
//! checks the engine driver runs at the boundary, before any mode-specific
//! execution begins.

use crate::program::Program;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown variable '{name}'")]
    UnknownVariable { name: String },

    #[error("unknown command '{name}' referenced via @cmd")]
    UnknownCommand { name: String },

    #[error("command '{name}' is declared more than once")]
    DuplicateCommand { name: String },

    #[error("command '{name}' references itself, directly or transitively, via @cmd")]
    CyclicCommandReference { name: String },
}

/// Whole-program reference validation, run once by the engine driver before
/// any command is executed in any mode. Collects every violation found
/// rather than stopping at the first, so a single run surfaces everything
/// wrong with the program.
pub fn validate_program(program: &Program) -> Result<(), Vec<ModelError>> {
    let mut errors = Vec::new();

    for name in program.duplicate_command_names() {
        errors.push(ModelError::DuplicateCommand { name });
    }

    for command in &program.commands {
        for referenced in command.referenced_commands() {
            if program.command(&referenced).is_none() {
                errors.push(ModelError::UnknownCommand { name: referenced });
            }
        }
    }

    for command in &program.commands {
        if let Some(cycle) = find_cycle(program, &command.name) {
            errors.push(ModelError::CyclicCommandReference { name: cycle });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn find_cycle(program: &Program, start: &str) -> Option<String> {
    fn visit(program: &Program, name: &str, stack: &mut Vec<String>, done: &mut HashSet<String>) -> Option<String> {
        if stack.iter().any(|s| s == name) {
            return Some(name.to_string());
        }
        if done.contains(name) {
            return None;
        }
        let Some(command) = program.command(name) else {
            return None;
        };
        stack.push(name.to_string());
        for referenced in command.referenced_commands() {
            if let Some(cycle) = visit(program, &referenced, stack, done) {
                stack.pop();
                return Some(cycle);
            }
        }
        stack.pop();
        done.insert(name.to_string());
        None
    }

    let mut stack = Vec::new();
    let mut done = HashSet::new();
    visit(program, start, &mut stack, &mut done)
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
