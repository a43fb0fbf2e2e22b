// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Runtime support for `cmdforge generate`'s emitted Rust. A generated entry
//! point depends on this crate the same way a hand-written program would: it
//! has no access back into the engine that produced it, so the handful of
//! shell-running primitives it calls — `execute_shell_command`,
//! `execute_shell_command_with_input`, `append_to_file` — are duplicated
//! here rather than shared with `cmdforge-engine`.

use std::io::Write;
use std::process::{Command, Stdio};

/// Mirrors `cmdforge_core::CommandResult`'s shape so generated code never
/// has to depend on the engine crate that produced it.
#[derive(Debug, Clone, Default)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs `command` through the host shell, forwarding its stdout/stderr to
/// this process's own streams once it exits.
pub fn execute_shell_command(command: &str, working_dir: Option<&str>) -> CommandResult {
    run(command, None, working_dir)
}

/// As [`execute_shell_command`], piping `input` to the child's stdin first.
pub fn execute_shell_command_with_input(command: &str, input: &str, working_dir: Option<&str>) -> CommandResult {
    run(command, Some(input), working_dir)
}

fn run(command: &str, stdin_data: Option<&str>, working_dir: Option<&str>) -> CommandResult {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }
    cmd.stdin(if stdin_data.is_some() { Stdio::piped() } else { Stdio::inherit() });
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(_) => {
            return CommandResult {
                exit_code: -1,
                ..Default::default()
            }
        }
    };
    if let Some(data) = stdin_data {
        if let Some(mut stdin) = child.stdin.take() {
            let _ = stdin.write_all(data.as_bytes());
        }
    }
    let output = match child.wait_with_output() {
        Ok(output) => output,
        Err(_) => {
            return CommandResult {
                exit_code: -1,
                ..Default::default()
            }
        }
    };

    std::io::stdout().write_all(&output.stdout).ok();
    std::io::stderr().write_all(&output.stderr).ok();

    CommandResult {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code: output.status.code().unwrap_or(-1),
    }
}

/// `>>`: append `data` to `path`, creating it (mode 0644 on unix) if absent.
pub fn append_to_file(path: &str, data: &str) -> std::io::Result<()> {
    use std::fs::OpenOptions;
    #[cfg(unix)]
    use std::os::unix::fs::OpenOptionsExt;

    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    options.mode(0o644);

    let mut file = options.open(path)?;
    file.write_all(data.as_bytes())
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
