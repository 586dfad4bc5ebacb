// Cinder - A sandboxed scripting language compiler with budgeted loops
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! End-to-end CLI integration tests.

use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

fn cargo_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cinder"))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn run_cli(args: &[&str], script: &PathBuf) -> Output {
    cargo_bin()
        .arg(script)
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Test --help flag.
#[test]
fn test_help_flag() {
    let output = cargo_bin()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("--budget"));
    assert!(text.contains("--no-budget"));
    assert!(text.contains("--watch"));
}

/// Test --version flag.
#[test]
fn test_version_flag() {
    let output = cargo_bin()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("cinder"));
    assert!(text.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_run_prints_result() {
    let output = run_cli(&[], &fixture("sum.cin"));
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "10\n");
}

#[test]
fn test_run_prints_output_lines() {
    let output = run_cli(&[], &fixture("countdown.cin"));
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "3\n2\n1\n");
}

#[test]
fn test_budget_exceeded_exit_code() {
    let output = run_cli(&["--budget", "10"], &fixture("spin.cin"));
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Resource budget exceeded"));
}

#[test]
fn test_no_budget_flag() {
    // Three iterations of cost two do not fit into a budget of five.
    let output = run_cli(&["--budget", "5"], &fixture("countdown.cin"));
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout(&output), "3\n2\n");

    let output = run_cli(&["--no-budget"], &fixture("countdown.cin"));
    assert!(output.status.success());
    assert_eq!(stdout(&output), "3\n2\n1\n");
}

#[test]
fn test_compile_error_exit_code() {
    let output = run_cli(&[], &fixture("no_escape.cin"));
    assert_eq!(output.status.code(), Some(1));
    let text = stderr(&output);
    assert!(text.contains("E232"));
    assert!(text.contains("no_escape.cin"));
}

#[test]
fn test_check_does_not_run() {
    let output = run_cli(&["--check", "--budget", "10"], &fixture("spin.cin"));
    assert!(output.status.success());
    assert_eq!(stdout(&output), "spin.cin: ok\n");
}

#[test]
fn test_disassemble() {
    let output = run_cli(&["--check", "--disassemble", "--budget", "10"], &fixture("spin.cin"));
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("0000 PUSH 10L\n0001 STORE 0\n"));
    assert!(text.contains("LOOP_COUNTER 0 1"));
}

#[test]
fn test_missing_file_exit_code() {
    let dir = TempDir::new().unwrap();
    let output = run_cli(&[], &dir.path().join("missing.cin"));
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("Cannot read"));
}

#[test]
fn test_runtime_error_keeps_earlier_output() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("divide.cin");
    std::fs::write(&script, "int z = 0; print(1); print(10 / z);").unwrap();

    let output = run_cli(&[], &script);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout(&output), "1\n");
    assert!(stderr(&output).contains("Division by zero"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    let output = run_cli(&["-vv"], &fixture("sum.cin"));
    assert!(output.status.success());
    assert_eq!(stdout(&output), "10\n");
    assert!(stderr(&output).contains("generated chunk"));
}
