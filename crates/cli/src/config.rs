// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk configuration: shell binary override, default timeout and retry
//! delay, a concurrency cap for `parallel`, and output preferences. Loaded
//! from an optional toml file; command-line flags layer on top in `main`.

use crate::error::CliError;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub shell: String,
    pub default_timeout_secs: u64,
    pub default_retry_delay_secs: u64,
    pub max_parallel: usize,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shell: "sh".to_string(),
            default_timeout_secs: 30,
            default_retry_delay_secs: 1,
            max_parallel: std::thread::available_parallelism().map(std::num::NonZeroUsize::get).unwrap_or(1) * 2,
            color: true,
        }
    }
}

impl Config {
    /// Loads from `path` if given, else returns the defaults. A path that
    /// was explicitly requested but doesn't exist or doesn't parse is an
    /// error; omitting the path entirely is not.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| CliError::ConfigParse {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
