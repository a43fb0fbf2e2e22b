// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Captured environment: an immutable snapshot of host environment variables
//! taken once when an execution context is created.
//!
//! This is a correctness invariant of the engine: runs are reproducible and
//! CI-detection logic (see the `confirm` decorator) cannot race with user
//! commands that mutate the process environment. Never consult the live
//! process environment while a context is executing.

use std::collections::HashMap;
use std::sync::Arc;

/// Fixed set of CI indicator variables recognised by the `confirm` decorator.
pub const CI_INDICATOR_VARS: &[&str] = &[
    "CI",
    "CONTINUOUS_INTEGRATION",
    "GITHUB_ACTIONS",
    "TRAVIS",
    "CIRCLECI",
    "JENKINS_URL",
    "GITLAB_CI",
    "BUILDKITE",
    "BUILD_NUMBER",
];

/// Read-only, shareable snapshot of environment variables.
///
/// Cloning is cheap (`Arc` clone); the snapshot is never mutated after
/// construction, so it can be shared by reference across a parent context
/// and all of its children without synchronization.
#[derive(Debug, Clone)]
pub struct CapturedEnvironment {
    vars: Arc<HashMap<String, String>>,
}

impl CapturedEnvironment {
    /// Snapshot the current process environment.
    pub fn capture() -> Self {
        Self {
            vars: Arc::new(std::env::vars().collect()),
        }
    }

    /// Build a snapshot from an explicit map, used by tests and the
    /// generator's startup-snapshot code path.
    pub fn from_map(vars: HashMap<String, String>) -> Self {
        Self {
            vars: Arc::new(vars),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Whether any of the fixed CI indicator variables is present and non-empty.
    pub fn looks_like_ci(&self) -> bool {
        CI_INDICATOR_VARS
            .iter()
            .any(|name| self.get(name).is_some_and(|v| !v.is_empty()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Default for CapturedEnvironment {
    fn default() -> Self {
        Self::from_map(HashMap::new())
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
