//! Integration tests for the depmerge binary

#![allow(deprecated)] // cargo_bin is the standard way to test CLI binaries

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn depmerge() -> Command {
    let mut cmd = Command::cargo_bin("depmerge").unwrap();
    cmd.env_remove("DEPMERGE_LOG");
    cmd
}

// =============================================================================
// CLI Tests
// =============================================================================

#[test]
fn test_cli_help() {
    depmerge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("dependency update"));
}

#[test]
fn test_cli_version() {
    depmerge()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_run_help() {
    depmerge()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_unknown_subcommand_fails() {
    depmerge().arg("frobnicate").assert().failure();
}

// =============================================================================
// classify
// =============================================================================

#[test]
fn test_classify_dependabot_with_manifest_change() {
    depmerge()
        .args([
            "classify",
            "build(deps): bump lodash from 4.17.20 to 4.17.21",
            "--manifest-changed",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("dependency update"))
        .stdout(predicate::str::contains("production"))
        .stdout(predicate::str::contains(
            "fix(deps): bump lodash from 4.17.20 to 4.17.21",
        ));
}

#[test]
fn test_classify_lock_file_maintenance() {
    depmerge()
        .args(["classify", "fix(deps): lock file maintenance"])
        .assert()
        .success()
        .stdout(predicate::str::contains("build(deps): lock file maintenance"));
}

#[test]
fn test_classify_security_alert() {
    depmerge()
        .args([
            "classify",
            "Potential security vulnerability found in minimist dependency",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("security alert"))
        .stdout(predicate::str::contains("commit title").not());
}

#[test]
fn test_classify_unrelated() {
    depmerge()
        .args(["classify", "Add dark mode"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unrelated"));
}

// =============================================================================
// config
// =============================================================================

#[test]
fn test_config_show_defaults_from_empty_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "").unwrap();

    depmerge()
        .args(["config", "show", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("dependabot"))
        .stdout(predicate::str::contains("Pika CI"))
        .stdout(predicate::str::contains("merge_method = \"squash\""));
}

#[test]
fn test_config_show_reflects_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "trusted_authors = [\"my-bot\"]\nchanged_files_limit = 5\n").unwrap();

    depmerge()
        .args(["config", "show", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("my-bot"))
        .stdout(predicate::str::contains("changed_files_limit = 5"));
}

#[test]
fn test_config_show_rejects_unknown_field() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "merge_strategy = \"squash\"\n").unwrap();

    depmerge()
        .args(["config", "show", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_config_path_prints_config_toml() {
    depmerge()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// =============================================================================
// run / auth without credentials
// =============================================================================

#[test]
fn test_run_without_token_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "").unwrap();

    // Empty PATH so the gh fallback can't be found either
    depmerge()
        .args(["run", "--dry-run", "--config"])
        .arg(&path)
        .env_remove("GITHUB_TOKEN")
        .env_remove("GH_TOKEN")
        .env("PATH", "")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GITHUB_TOKEN"));
}

#[test]
fn test_auth_test_without_token_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "").unwrap();

    depmerge()
        .args(["auth", "test", "--config"])
        .arg(&path)
        .env_remove("GITHUB_TOKEN")
        .env_remove("GH_TOKEN")
        .env("PATH", "")
        .assert()
        .failure();
}
