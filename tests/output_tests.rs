// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use sql_review::{
    config::AnalysisConfig,
    datatype::DataTypeRegistry,
    dialect::SqlDialect,
    engine::Engine,
    output::{OutputFormat, OutputOptions, SourceReport, format_reports, format_sarif}
};

fn report(source: &str, sql: &str, dialect: SqlDialect) -> SourceReport {
    let config = AnalysisConfig {
        dialect,
        ..Default::default()
    };
    SourceReport {
        source: source.to_string(),
        report: Engine::new(DataTypeRegistry::global(), &config).analyze(sql)
    }
}

fn options(format: OutputFormat, verbose: bool) -> OutputOptions {
    OutputOptions {
        format,
        colored: false,
        verbose
    }
}

#[test]
fn test_output_options_default() {
    let opts = OutputOptions::default();
    assert_eq!(opts.format, OutputFormat::Text);
    assert!(opts.colored);
    assert!(!opts.verbose);
}

#[test]
fn test_text_multiple_sources_in_order() {
    let reports = vec![
        report("first.sql", "DELETE FROM a;", SqlDialect::Generic),
        report("second.sql", "SELECT id FROM a WHERE id = 1;", SqlDialect::Generic),
    ];
    let output = format_reports(&reports, &options(OutputFormat::Text, false));
    let first = output.find("=== first.sql ===").unwrap();
    let second = output.find("=== second.sql ===").unwrap();
    assert!(first < second);
    assert!(output.contains("No issues found"));
}

#[test]
fn test_text_verbose_shows_tables_and_confidence() {
    let reports = vec![report(
        "schema.sql",
        "CREATE TABLE users (id INT PRIMARY KEY, name TEXT);\nSELECT * FROM users WHERE id = 1;",
        SqlDialect::Generic
    )];
    let quiet = format_reports(&reports, &options(OutputFormat::Text, false));
    let verbose = format_reports(&reports, &options(OutputFormat::Text, true));
    assert!(!quiet.contains("table users"));
    assert!(verbose.contains("table users (line 1)"));
    assert!(verbose.contains("confidence"));
}

#[test]
fn test_text_type_migrations() {
    let reports = vec![report(
        "schema.sql",
        "CREATE TABLE docs (id INT PRIMARY KEY, body JSONB);",
        SqlDialect::MySQL
    )];
    let output = format_reports(&reports, &options(OutputFormat::Text, false));
    assert!(output.contains("Type migrations:"));
    assert!(output.contains("docs.body JSONB -> JSON"));
}

#[test]
fn test_no_color_has_no_escape_codes() {
    let reports = vec![report("a.sql", "DROP TABLE a;", SqlDialect::Generic)];
    let output = format_reports(&reports, &options(OutputFormat::Text, true));
    assert!(!output.contains('\u{1b}'));
}

#[test]
fn test_json_lists_every_source() {
    let reports = vec![
        report("a.sql", "DELETE FROM a;", SqlDialect::Generic),
        report("b.sql", "", SqlDialect::Generic),
    ];
    let output = format_reports(&reports, &options(OutputFormat::Json, false));
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    let list = value.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[1]["source"], "b.sql");
    assert_eq!(list[1]["report"]["quality_score"], 100);
}

#[test]
fn test_yaml_output() {
    let reports = vec![report("a.sql", "DELETE FROM a;", SqlDialect::Generic)];
    let output = format_reports(&reports, &options(OutputFormat::Yaml, false));
    assert!(output.contains("source: a.sql"));
    assert!(output.contains("SEC001"));
}

#[test]
fn test_sarif_single_run_for_many_sources() {
    let reports = vec![
        report("a.sql", "DELETE FROM a;", SqlDialect::Generic),
        report("b.sql", "SELECT * FROM b WHERE id = 1;", SqlDialect::Generic),
    ];
    let output = format_sarif(&reports);
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["version"], "2.1.0");
    let runs = value["runs"].as_array().unwrap();
    assert_eq!(runs.len(), 1);
    let results = runs[0]["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["level"], "error");
    assert_eq!(results[1]["level"], "warning");
    assert_eq!(
        results[1]["locations"][0]["physicalLocation"]["artifactLocation"]["uri"],
        "b.sql"
    );
}
