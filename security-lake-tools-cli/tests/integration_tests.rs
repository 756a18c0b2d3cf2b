//! Integration tests for the Security Lake Tools CLI binary.
//!
//! These cover argument parsing, the catalog listing and input validation.
//! None of them reach AWS: every invocation either exits before credentials
//! are loaded or is rejected by argument validation.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

/// Helper function to get the CLI binary command
fn cli_command() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("security-lake-tools"))
}

/// Helper function to get the CLI binary command with create-source subcommand
fn create_source_command() -> Command {
    let mut cmd = cli_command();
    cmd.arg("create-source");
    cmd
}

#[test]
fn test_cli_help() {
    cli_command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Creates Amazon Security Lake custom sources",
        ))
        .stdout(predicate::str::contains("create-source"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn test_cli_version() {
    cli_command()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("security-lake-tools"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_no_arguments() {
    cli_command()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_create_source_help() {
    create_source_command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--external-id"))
        .stdout(predicate::str::contains("--glue-role-arn"))
        .stdout(predicate::str::contains("--no-create-role"))
        .stdout(predicate::str::contains("--skip-role-check"))
        .stdout(predicate::str::contains("[default: us-east-1]"));
}

#[test]
fn test_status_help() {
    cli_command()
        .args(["status", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--region"))
        .stdout(predicate::str::contains("--profile"));
}

#[test]
fn test_list_prints_catalog_by_category() {
    create_source_command()
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Available OCSF class UIDs:"))
        .stdout(predicate::str::contains("System Activity:"))
        .stdout(predicate::str::contains("  1001: FILE_ACTIVITY"))
        .stdout(predicate::str::contains("  4003: DNS_ACTIVITY"))
        .stdout(predicate::str::contains("Windows Extension:"))
        .stdout(predicate::str::contains("  201004: WINDOWS_SERVICE_ACTIVITY"));
}

#[test]
fn test_list_category_order() {
    let output = create_source_command().arg("--list").output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();

    let system = stdout.find("System Activity:").unwrap();
    let findings = stdout.find("Findings:").unwrap();
    let network = stdout.find("Network Activity:").unwrap();
    let windows = stdout.find("Windows Extension:").unwrap();
    assert!(system < findings && findings < network && network < windows);
}

#[test]
fn test_missing_external_id_is_usage_error() {
    create_source_command()
        .args(["1001", "--account-id", "123456789012"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--external-id"));
}

#[test]
fn test_blank_external_id_is_usage_error() {
    create_source_command()
        .args(["1001", "--account-id", "123456789012", "--external-id", "  "])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--external-id is required"));
}

#[test]
fn test_missing_class_uid_is_usage_error() {
    create_source_command()
        .args(["--external-id", "test-ext"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("CLASS_UID"));
}

#[test]
fn test_non_numeric_class_uid_is_usage_error() {
    create_source_command()
        .args(["file-activity", "--external-id", "test-ext"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_invalid_account_id_is_usage_error() {
    create_source_command()
        .args(["1001", "--account-id", "12345", "--external-id", "test-ext"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid account id '12345'"));
}

#[test]
fn test_invalid_glue_role_arn_is_usage_error() {
    create_source_command()
        .args([
            "1001",
            "--account-id",
            "123456789012",
            "--external-id",
            "test-ext",
            "--glue-role-arn",
            "arn:aws:s3:::my-bucket",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid Glue role ARN"));
}
