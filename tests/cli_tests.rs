//! Integration tests for the CLI interface

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A command isolated from the user's config file and environment.
fn defect_pulse(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("defect-pulse").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("DEFECT_PULSE_BASE_URL")
        .env_remove("DEFECT_PULSE_TIMEOUT_SECS")
        .env_remove("DEFECT_PULSE_UNKNOWN_COLOR")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help_flag() {
    let home = TempDir::new().unwrap();
    defect_pulse(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("projects"))
        .stdout(predicate::str::contains("metrics"));
}

#[test]
fn test_missing_command_is_usage_error() {
    let home = TempDir::new().unwrap();
    defect_pulse(&home).assert().failure().code(2);
}

#[test]
fn test_invalid_risk_filter() {
    let home = TempDir::new().unwrap();
    defect_pulse(&home)
        .args(["projects", "--risk", "critical"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("critical"));
}

#[test]
fn test_metrics_requires_numeric_project_id() {
    let home = TempDir::new().unwrap();
    defect_pulse(&home)
        .args(["metrics", "billing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_missing_config_file_exits_with_config_error() {
    let home = TempDir::new().unwrap();
    defect_pulse(&home)
        .args(["-c"])
        .arg(home.path().join("nope.toml"))
        .arg("projects")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Cannot read config"));
}

#[test]
fn test_malformed_config_file_is_rejected() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("config.toml");
    std::fs::write(&path, "request_timeout_secs = \"soon\"\n").unwrap();

    defect_pulse(&home)
        .arg("-c")
        .arg(&path)
        .arg("projects")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_bad_env_override_is_rejected() {
    let home = TempDir::new().unwrap();
    defect_pulse(&home)
        .env("DEFECT_PULSE_UNKNOWN_COLOR", "purple")
        .arg("projects")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unknown color policy"));
}
