//! End-to-end tests for the `contrib-harvest completions` command.
//!
//! These tests verify the CLI behavior of the `completions` command by invoking
//! the binary directly and checking its output.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_completions_help() {
    let mut cmd = cargo_bin_cmd!("contrib-harvest");
    cmd.arg("completions")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Generate shell completion scripts",
        ))
        .stdout(predicate::str::contains("bash"))
        .stdout(predicate::str::contains("zsh"))
        .stdout(predicate::str::contains("fish"))
        .stdout(predicate::str::contains("powershell"))
        .stdout(predicate::str::contains("elvish"));
}

#[test]
fn test_completions_bash() {
    let mut cmd = cargo_bin_cmd!("contrib-harvest");
    cmd.arg("completions")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("_contrib__harvest()"))
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("metadata"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_completions_zsh() {
    let mut cmd = cargo_bin_cmd!("contrib-harvest");
    cmd.arg("completions")
        .arg("zsh")
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef contrib-harvest"))
        .stdout(predicate::str::contains("git"));
}

#[test]
fn test_completions_fish() {
    let mut cmd = cargo_bin_cmd!("contrib-harvest");
    cmd.arg("completions")
        .arg("fish")
        .assert()
        .success()
        .stdout(predicate::str::contains("__fish_contrib_harvest"))
        .stdout(predicate::str::contains("resolve"));
}

#[test]
fn test_completions_powershell() {
    let mut cmd = cargo_bin_cmd!("contrib-harvest");
    cmd.arg("completions")
        .arg("powershell")
        .assert()
        .success()
        .stdout(predicate::str::contains("Register-ArgumentCompleter"))
        .stdout(predicate::str::contains("contrib-harvest"));
}

#[test]
fn test_completions_invalid_shell() {
    let mut cmd = cargo_bin_cmd!("contrib-harvest");
    cmd.arg("completions")
        .arg("invalid-shell")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_completions_missing_shell_argument() {
    let mut cmd = cargo_bin_cmd!("contrib-harvest");
    cmd.arg("completions")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}
