//! Process-level tests for the `dbdump` binary.
//!
//! None of these need a MySQL server: they cover argument parsing and the
//! failure paths that happen before or at connect time.

#![allow(clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;

const DB_VARS: [&str; 5] = ["DB_HOST", "DB_PORT", "DB_USER", "DB_PASSWORD", "DB_NAME"];

/// Runs from the temp dir with the connection variables cleared so that a
/// developer's `.env` or shell exports cannot leak in.
fn dbdump() -> Command {
    let mut cmd = Command::cargo_bin("dbdump").unwrap();
    cmd.current_dir(std::env::temp_dir());
    for var in DB_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_cli_help() {
    dbdump()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("DB_NAME"))
        .stdout(predicate::str::contains("--ignore-table"))
        .stdout(predicate::str::contains("--create-database"))
        .stdout(predicate::str::contains("--where"));
}

#[test]
fn test_cli_version() {
    dbdump()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_missing_database_name() {
    dbdump()
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("DB_NAME environment variable is required"));
}

#[test]
fn test_cli_connection_refused() {
    dbdump()
        .env("DB_HOST", "127.0.0.1")
        .env("DB_PORT", "1")
        .env("DB_NAME", "shop")
        .env("DB_PASSWORD", "correct-horse-battery")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("127.0.0.1:1"))
        .stderr(predicate::str::contains("correct-horse-battery").not());
}

#[test]
fn test_cli_quiet_still_reports_errors() {
    dbdump()
        .arg("--quiet")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("DB_NAME"));
}

#[test]
fn test_cli_rejects_unknown_flag() {
    dbdump()
        .arg("--definitely-not-a-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--definitely-not-a-flag"));
}

#[test]
fn test_cli_rejects_bad_boolean() {
    dbdump()
        .arg("--create-database=maybe")
        .assert()
        .failure();
}

#[test]
fn test_cli_where_with_second_statement_fails_before_connecting() {
    dbdump()
        .env("DB_HOST", "127.0.0.1")
        .env("DB_PORT", "1")
        .env("DB_NAME", "shop")
        .arg("--where=1=1; DELETE FROM users")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("single predicate"))
        .stderr(predicate::str::contains("Failed to connect").not());
}
