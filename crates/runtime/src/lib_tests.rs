// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn execute_shell_command_captures_stdout_and_exit_code() {
    let result = execute_shell_command("echo hello", None);
    assert!(result.success());
    assert_eq!(result.stdout.trim(), "hello");
}

#[test]
fn execute_shell_command_reports_a_nonzero_exit() {
    let result = execute_shell_command("exit 3", None);
    assert!(!result.success());
    assert_eq!(result.exit_code, 3);
}

#[test]
fn execute_shell_command_with_input_forwards_stdin() {
    let result = execute_shell_command_with_input("cat", "piped text", None);
    assert_eq!(result.stdout, "piped text");
}

#[test]
fn execute_shell_command_honors_working_dir() {
    let dir = std::env::temp_dir();
    let result = execute_shell_command("pwd", dir.to_str());
    assert_eq!(result.stdout.trim(), dir.to_str().unwrap_or_default());
}

#[test]
fn append_to_file_creates_and_appends() {
    let dir = std::env::temp_dir().join(format!("cmdforge-runtime-test-{}", std::process::id()));
    let _ = std::fs::create_dir_all(&dir);
    let path = dir.join("out.txt");
    let _ = std::fs::remove_file(&path);

    append_to_file(path.to_str().unwrap_or_default(), "first\n").unwrap_or_default();
    append_to_file(path.to_str().unwrap_or_default(), "second\n").unwrap_or_default();

    let contents = std::fs::read_to_string(&path).unwrap_or_default();
    assert_eq!(contents, "first\nsecond\n");
    let _ = std::fs::remove_file(&path);
}
