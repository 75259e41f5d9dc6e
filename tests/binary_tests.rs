//! Integration tests for the sql-review binary.

use std::io::Write;

use assert_cmd::{Command, cargo::cargo_bin_cmd};
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("sql-review");
    cmd.env_remove("SQL_REVIEW_CONFIG")
        .env_remove("SQL_REVIEW_DIALECT")
        .env_remove("SQL_REVIEW_STRICT")
        .env_remove("RUST_LOG");
    cmd
}

fn sql_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", content).unwrap();
    file
}

#[test]
fn test_analyze_clean_file() {
    let file = sql_file("SELECT id FROM users WHERE id = 1;");

    cmd()
        .args(["analyze", file.path().to_str().unwrap(), "--no-color"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("No issues found"))
        .stdout(predicate::str::contains("Score: 100/100"));
}

#[test]
fn test_analyze_medium_finding_exits_one() {
    let file = sql_file("SELECT * FROM users WHERE id = 1;");

    cmd()
        .args(["analyze", file.path().to_str().unwrap(), "--no-color"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("PERF001"));
}

#[test]
fn test_analyze_critical_finding_exits_two() {
    let file = sql_file("DELETE FROM users;");

    cmd()
        .args(["analyze", file.path().to_str().unwrap(), "--no-color"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("SEC001"));
}

#[test]
fn test_min_score_fails_clean_exit() {
    let file = sql_file("SELECT * FROM users WHERE id = 1;");

    cmd()
        .args([
            "analyze",
            file.path().to_str().unwrap(),
            "--no-color",
            "--min-score",
            "100"
        ])
        .assert()
        .code(2);
}

#[test]
fn test_analyze_stdin() {
    cmd()
        .args(["analyze", "-", "--no-color"])
        .write_stdin("DROP TABLE users;")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("=== stdin ==="))
        .stdout(predicate::str::contains("SEC003"));
}

#[test]
fn test_analyze_json_output() {
    let file = sql_file("DELETE FROM users;");

    let output = cmd()
        .args(["analyze", file.path().to_str().unwrap(), "-f", "json"])
        .output()
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0]["report"]["findings"][0]["rule_id"], "SEC001");
}

#[test]
fn test_analyze_sarif_output() {
    let file = sql_file("SELECT * FROM users WHERE id = 1;");

    cmd()
        .args(["analyze", file.path().to_str().unwrap(), "-f", "sarif"])
        .assert()
        .stdout(predicate::str::contains("\"version\": \"2.1.0\""))
        .stdout(predicate::str::contains("\"ruleId\": \"PERF001\""));
}

#[test]
fn test_analyze_multiple_files() {
    let first = sql_file("SELECT id FROM a WHERE id = 1;");
    let second = sql_file("SELECT id FROM b WHERE id = 1;");

    cmd()
        .args([
            "analyze",
            first.path().to_str().unwrap(),
            second.path().to_str().unwrap(),
            "--no-color"
        ])
        .assert()
        .code(0)
        .stdout(predicate::str::contains(first.path().to_str().unwrap()))
        .stdout(predicate::str::contains(second.path().to_str().unwrap()));
}

#[test]
fn test_config_disables_rule() {
    let file = sql_file("SELECT * FROM users WHERE id = 1;");
    let mut config = NamedTempFile::new().unwrap();
    writeln!(config, "[rules]\ndisabled = [\"PERF001\"]").unwrap();

    cmd()
        .args([
            "analyze",
            file.path().to_str().unwrap(),
            "--no-color",
            "--config",
            config.path().to_str().unwrap()
        ])
        .assert()
        .code(0);
}

#[test]
fn test_invalid_config_fails() {
    let file = sql_file("SELECT id FROM users WHERE id = 1;");
    let mut config = NamedTempFile::new().unwrap();
    writeln!(config, "[analysis]\ndialect = \"informix\"").unwrap();

    cmd()
        .args([
            "analyze",
            file.path().to_str().unwrap(),
            "--config",
            config.path().to_str().unwrap()
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_analyze_missing_file() {
    cmd()
        .args(["analyze", "/nonexistent/queries.sql"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_analyze_binary_input_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&[0x53, 0x00, 0x51, 0x4c]).unwrap();

    cmd()
        .args(["analyze", file.path().to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_types_resolve() {
    cmd()
        .args(["types", "resolve", "int4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("INTEGER (numeric)"));
}

#[test]
fn test_types_resolve_unknown() {
    cmd()
        .args(["types", "resolve", "no_such_type"])
        .assert()
        .code(1);
}

#[test]
fn test_types_compatible() {
    cmd()
        .args(["types", "compatible", "UUID", "--dialect", "mssql"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("UNIQUEIDENTIFIER"));
}

#[test]
fn test_types_infer() {
    cmd()
        .args(["types", "infer", "2024-01-01", "2023-06-30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DATE"));
}

#[test]
fn test_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("types"));
}

#[test]
fn test_version() {
    cmd().arg("--version").assert().success();
}
