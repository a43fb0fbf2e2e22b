// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decorator and chain-execution errors. Every variant surfaces through the
//! `error` field of an `ExecutionResult`, wrapped with the
//! `"<decorator name> <phase> failed: <inner>"` message pattern so the
//! origin stays visible through composition.

use cmdforge_core::{ModelError, SchemaError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecoratorError {
    #[error("{decorator} validation failed: {source}")]
    Validation {
        decorator: String,
        #[source]
        source: SchemaError,
    },

    #[error("{decorator} reference failed: {source}")]
    Reference {
        decorator: String,
        #[source]
        source: ModelError,
    },

    #[error("{decorator} execution failed: {message}")]
    Execution { decorator: String, message: String },

    #[error("{decorator} timed out after {elapsed_ms}ms")]
    Timeout { decorator: String, elapsed_ms: u64 },

    #[error("{decorator} cancelled: {reason}")]
    Cancellation { decorator: String, reason: String },

    #[error("{decorator} I/O failed: {source}")]
    Io {
        decorator: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{decorator} aborted: user declined confirmation")]
    UserAbort { decorator: String },

    #[error("parallel execution failed: {0}")]
    Aggregate(String),

    #[error("engine not wired for {what}")]
    Wiring { what: String },
}

impl DecoratorError {
    pub fn validation(decorator: impl Into<String>, source: SchemaError) -> Self {
        Self::Validation {
            decorator: decorator.into(),
            source,
        }
    }

    pub fn execution(decorator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Execution {
            decorator: decorator.into(),
            message: message.into(),
        }
    }

    /// Build an `AggregateError` from a batch of sibling failures, as
    /// produced by `parallel`: `"parallel execution failed: "` followed by
    /// the `; `-joined child messages.
    pub fn aggregate(children: impl IntoIterator<Item = String>) -> Self {
        Self::Aggregate(children.into_iter().collect::<Vec<_>>().join("; "))
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
