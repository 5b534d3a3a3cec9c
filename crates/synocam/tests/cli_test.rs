//! Integration tests for the `synocam` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! and error handling — all without requiring a live Surveillance Station.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `synocam` binary with env isolation.
///
/// Clears all `SYNOCAM_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn synocam_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("synocam");
    cmd.env("HOME", "/tmp/synocam-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/synocam-test-nonexistent")
        .env_remove("SYNOCAM_PROFILE")
        .env_remove("SYNOCAM_STATION")
        .env_remove("SYNOCAM_ACCOUNT")
        .env_remove("SYNOCAM_OUTPUT")
        .env_remove("SYNOCAM_INSECURE")
        .env_remove("SYNOCAM_TIMEOUT")
        .env_remove("SYNOCAM_PASSWORD");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = synocam_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    synocam_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Surveillance Station")
            .and(predicate::str::contains("cameras"))
            .and(predicate::str::contains("snapshot"))
            .and(predicate::str::contains("watch")),
    );
}

#[test]
fn test_version_flag() {
    synocam_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("synocam"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    synocam_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    synocam_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    synocam_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = synocam_cmd().arg("foobar").output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid subcommand"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_cameras_list_no_station() {
    synocam_cmd()
        .args(["cameras", "list"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("config")
                .or(predicate::str::contains("Configuration"))
                .or(predicate::str::contains("station"))
                .or(predicate::str::contains("profile")),
        );
}

#[test]
fn test_config_show_no_config() {
    // `config show` renders the default config when no file exists.
    synocam_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_path() {
    synocam_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_invalid_output_format() {
    let output = synocam_cmd()
        .args(["--output", "invalid", "cameras", "list"])
        .output()
        .unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid output format"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid")
            || text.contains("possible values")
            || text.contains("valid value"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_invalid_event_kind() {
    let output = synocam_cmd()
        .args(["events", "list", "1", "--kinds", "earthquake"])
        .output()
        .unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid event kind"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid event kinds:\n{text}"
    );
}

#[test]
fn test_global_flags_parsing() {
    // All flags should parse correctly — the failure should be about
    // missing station config, not about argument parsing.
    synocam_cmd()
        .args([
            "--output",
            "json",
            "--verbose",
            "--insecure",
            "--timeout",
            "60",
            "cameras",
            "list",
        ])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("config")
                .or(predicate::str::contains("Configuration"))
                .or(predicate::str::contains("station"))
                .or(predicate::str::contains("profile")),
        );
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_cameras_subcommands_exist() {
    synocam_cmd()
        .args(["cameras", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("info"))
                .and(predicate::str::contains("enable"))
                .and(predicate::str::contains("disable")),
        );
}

#[test]
fn test_ptz_subcommands_exist() {
    synocam_cmd()
        .args(["ptz", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("move")
                .and(predicate::str::contains("zoom"))
                .and(predicate::str::contains("presets"))
                .and(predicate::str::contains("patrols")),
        );
}

#[test]
fn test_config_subcommands_exist() {
    synocam_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("path")),
        );
}

#[test]
fn test_snapshot_requires_camera() {
    let output = synocam_cmd().arg("snapshot").output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage error");
}
