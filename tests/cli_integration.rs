//! Integration tests for the uzp CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.
//! Interactive prompts are bypassed with the `UZP_PASSWORD` env var;
//! flows that need a value prompt (`add`) are covered by the library
//! tests instead.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper: get a Command pointing at the uzp binary, with HOME set to
/// a temp dir so no real user config leaks into the test.
fn uzp(home: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("uzp").expect("binary should exist");
    cmd.env("HOME", home.path());
    cmd.env_remove("UZP_PASSWORD");
    cmd
}

#[test]
fn help_flag_shows_usage() {
    let home = TempDir::new().unwrap();
    uzp(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Encrypted secret vault protected by a master password",
        ))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("rm"));
}

#[test]
fn version_flag_shows_version() {
    let home = TempDir::new().unwrap();
    uzp(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("uzp"));
}

#[test]
fn no_args_shows_help() {
    let home = TempDir::new().unwrap();
    uzp(&home)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn init_creates_vault_at_default_path() {
    let home = TempDir::new().unwrap();

    uzp(&home)
        .arg("init")
        .env("UZP_PASSWORD", "a-strong-password")
        .assert()
        .success()
        .stdout(predicate::str::contains("Vault initialized successfully"));

    assert!(home.path().join(".uzp").join("uzp.vault").exists());
}

#[test]
fn init_respects_vault_flag() {
    let home = TempDir::new().unwrap();
    let vault_file = home.path().join("custom.vault");

    uzp(&home)
        .args(["init", "--vault", vault_file.to_str().unwrap()])
        .env("UZP_PASSWORD", "a-strong-password")
        .assert()
        .success();

    assert!(vault_file.exists());
    assert!(!home.path().join(".uzp").join("uzp.vault").exists());
}

#[test]
fn init_twice_fails() {
    let home = TempDir::new().unwrap();

    uzp(&home)
        .arg("init")
        .env("UZP_PASSWORD", "a-strong-password")
        .assert()
        .success();

    uzp(&home)
        .arg("init")
        .env("UZP_PASSWORD", "another-password")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn init_rejects_weak_password() {
    let home = TempDir::new().unwrap();

    uzp(&home)
        .arg("init")
        .env("UZP_PASSWORD", "short")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8 characters"));

    assert!(!home.path().join(".uzp").join("uzp.vault").exists());
}

#[test]
fn list_on_fresh_vault_reports_empty() {
    let home = TempDir::new().unwrap();

    uzp(&home)
        .arg("init")
        .env("UZP_PASSWORD", "a-strong-password")
        .assert()
        .success();

    uzp(&home)
        .arg("list")
        .env("UZP_PASSWORD", "a-strong-password")
        .assert()
        .success()
        .stdout(predicate::str::contains("The vault is empty"));
}

#[test]
fn list_with_wrong_password_fails() {
    let home = TempDir::new().unwrap();

    uzp(&home)
        .arg("init")
        .env("UZP_PASSWORD", "a-strong-password")
        .assert()
        .success();

    uzp(&home)
        .arg("list")
        .env("UZP_PASSWORD", "not-the-password")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Authentication failed"));
}

#[test]
fn get_on_missing_vault_fails() {
    let home = TempDir::new().unwrap();

    uzp(&home)
        .args(["get", "some-entry"])
        .env("UZP_PASSWORD", "whatever-password")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Vault not found"));
}

#[test]
fn get_missing_entry_fails() {
    let home = TempDir::new().unwrap();

    uzp(&home)
        .arg("init")
        .env("UZP_PASSWORD", "a-strong-password")
        .assert()
        .success();

    uzp(&home)
        .args(["get", "no-such-entry"])
        .env("UZP_PASSWORD", "a-strong-password")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
