// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The CLI's own error type. Thin wrapper around whatever the engine,
//! config loader, or output writer report, with each variant carrying the
//! process exit code `main` should report for it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("unknown command '{name}'")]
    UnknownCommand { name: String },

    #[error("'{command}' failed: {message}")]
    ExecutionFailed { command: String, message: String },

    #[error("could not read config file '{path}': {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file '{path}': {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("could not write output to '{path}': {source}")]
    OutputWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not render plan as JSON: {source}")]
    PlanSerialize {
        #[source]
        source: serde_json::Error,
    },
}

impl CliError {
    /// The process exit status this error should produce. Mirrors
    /// interpreter mode's own contract: a failed command exits non-zero,
    /// everything else that stops the CLI before a command even runs exits 2.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::UnknownCommand { .. } => 2,
            CliError::ConfigRead { .. } | CliError::ConfigParse { .. } => 2,
            CliError::ExecutionFailed { .. } => 1,
            CliError::OutputWrite { .. } | CliError::PlanSerialize { .. } => 1,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
