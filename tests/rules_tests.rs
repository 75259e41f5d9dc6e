// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use sql_review::{
    config::{AnalysisConfig, RulesConfig},
    datatype::DataTypeRegistry,
    dialect::SqlDialect,
    rules::{
        Finding, QualityScore, Rule, RuleBasedAnalyzer, RuleCategory, RuleInfo, Severity,
        SourceLine, builtin_rules
    },
    schema::SchemaExtractor
};

struct NoSleep;

impl Rule for NoSleep {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "CUSTOM001",
            name:     "SLEEP call",
            severity: Severity::High,
            category: RuleCategory::Performance
        }
    }

    fn check(&self, line: &SourceLine<'_>) -> Option<Finding> {
        line.code
            .to_ascii_uppercase()
            .contains("SLEEP(")
            .then(|| Finding::new(&self.info(), "SLEEP stalls the connection").at_line(line.number))
    }
}

fn analyzer() -> RuleBasedAnalyzer<'static> {
    RuleBasedAnalyzer::new(DataTypeRegistry::global())
}

fn ids(sql: &str) -> Vec<&'static str> {
    analyzer().analyze(sql).0.iter().map(|f| f.rule_id).collect()
}

#[test]
fn test_security_rules() {
    assert_eq!(ids("DELETE FROM users;"), vec!["SEC001"]);
    assert_eq!(ids("UPDATE users SET active = 0;"), vec!["SEC002"]);
    assert_eq!(ids("DROP TABLE users;"), vec!["SEC003"]);
    assert_eq!(ids("TRUNCATE TABLE logs;"), vec!["SEC004"]);
    assert_eq!(ids("SELECT id FROM users WHERE name = 'x' OR 1=1;"), vec!["SEC005"]);
    assert_eq!(ids("GRANT ALL ON db.* TO app;"), vec!["SEC006"]);
}

#[test]
fn test_guarded_statements_pass() {
    assert!(ids("DELETE FROM users WHERE id = 1;").is_empty());
    assert!(ids("UPDATE users SET active = 0 WHERE id = 1;").is_empty());
}

#[test]
fn test_performance_rules() {
    assert_eq!(ids("SELECT * FROM users WHERE id = 1;"), vec!["PERF001"]);
    assert_eq!(
        ids("SELECT id FROM users WHERE name LIKE '%son';"),
        vec!["PERF002"]
    );
    assert_eq!(
        ids("SELECT id FROM t WHERE id NOT IN (SELECT t_id FROM s);"),
        vec!["PERF005"]
    );
    assert_eq!(
        ids("SELECT id FROM t ORDER BY RAND() LIMIT 1;"),
        vec!["PERF007"]
    );
}

#[test]
fn test_semantic_rules() {
    assert_eq!(ids("SELECT id FROM t WHERE deleted_at = NULL;"), vec!["SEM001"]);
    assert_eq!(ids("INSERT INTO t VALUES (1, 2);"), vec!["SEM002"]);
    assert_eq!(ids("SELECT a, b FROM t GROUP BY 1;"), vec!["SEM003"]);
}

#[test]
fn test_every_matching_rule_reports() {
    let found = ids("SELECT * FROM users WHERE deleted_at = NULL;");
    assert!(found.contains(&"PERF001"));
    assert!(found.contains(&"SEM001"));
}

#[test]
fn test_findings_carry_line_and_fragment() {
    let (findings, _) = analyzer().analyze("SELECT id FROM t WHERE id = 1;\n\nDELETE FROM t;");
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].line, Some(3));
    assert_eq!(findings[0].fragment, "DELETE FROM t;");
    assert!(findings[0].suggestion.is_some());
}

#[test]
fn test_score_penalties() {
    let (_, score) = analyzer().analyze("SELECT id FROM t WHERE id = 1;");
    assert_eq!(score, QualityScore::MAX);
    let (_, score) = analyzer().analyze("DELETE FROM a;\nDELETE FROM b;\nDELETE FROM c;\nDELETE FROM d;\nDELETE FROM e;");
    assert_eq!(score.value(), 0);
}

#[test]
fn test_disabled_rules_and_overrides() {
    let mut severity = HashMap::new();
    severity.insert("perf001".to_string(), "critical".to_string());
    let rules = RulesConfig {
        disabled: vec!["SEC001".to_string()],
        severity
    };
    let analyzer =
        RuleBasedAnalyzer::with_config(DataTypeRegistry::global(), &AnalysisConfig::default(), rules);
    let (findings, _) = analyzer.analyze("DELETE FROM t;\nSELECT * FROM t WHERE id = 1;");
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].rule_id, "PERF001");
    assert_eq!(findings[0].severity, Severity::Critical);
}

#[test]
fn test_custom_rule() {
    let analyzer = analyzer().with_rule(Box::new(NoSleep));
    let (findings, _) = analyzer.analyze("SELECT SLEEP(5) FROM dual WHERE id = 1;");
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].rule_id, "CUSTOM001");
}

#[test]
fn test_disabled_custom_rule_is_not_added() {
    let rules = RulesConfig {
        disabled: vec!["CUSTOM001".to_string()],
        ..Default::default()
    };
    let base =
        RuleBasedAnalyzer::with_config(DataTypeRegistry::global(), &AnalysisConfig::default(), rules);
    let count = base.rule_count();
    assert_eq!(base.with_rule(Box::new(NoSleep)).rule_count(), count);
}

#[test]
fn test_strict_mode() {
    let config = AnalysisConfig {
        dialect: SqlDialect::PostgreSQL,
        strict: true,
        ..Default::default()
    };
    let analyzer =
        RuleBasedAnalyzer::with_config(DataTypeRegistry::global(), &config, RulesConfig::default());
    let (findings, _) = analyzer.analyze("SELEC id FROM t;");
    assert!(findings.iter().any(|f| f.rule_id == "SYN105"));
}

#[test]
fn test_schema_aware_rules() {
    let sql = "CREATE TABLE logs (msg TEXT);\nSELECT msg FROM logs WHERE msg = 'x';";
    let extraction = SchemaExtractor::extract_with_issues(sql);
    let (findings, _) = analyzer().analyze_with_schema(sql, &extraction);
    let found: Vec<&str> = findings.iter().map(|f| f.rule_id).collect();
    assert!(found.contains(&"SCH001"));
    assert!(found.contains(&"SCH011"));
}

#[test]
fn test_builtin_rule_catalog() {
    let rules = builtin_rules();
    for category in RuleCategory::PRIORITY {
        assert!(rules.iter().any(|r| r.category == category));
    }
    assert!(rules.iter().any(|r| r.id == "SYN105"));
    assert!(rules.iter().any(|r| r.id == "SCH011"));
}

#[test]
fn test_upsert_null_assignments_pass() {
    assert!(ids("INSERT INTO t (a) VALUES (1) ON CONFLICT (a) DO UPDATE SET b = NULL;").is_empty());
    assert!(ids("INSERT INTO t (a) VALUES (1) ON DUPLICATE KEY UPDATE b = NULL;").is_empty());
    assert_eq!(
        ids("SELECT a.id FROM a JOIN b ON b.a_id = NULL;"),
        vec!["SEM001"]
    );
}

#[test]
fn test_backslash_in_standard_literal() {
    assert!(ids("SELECT id FROM files WHERE path = 'C:\\';").is_empty());
    let (_, score) = analyzer().analyze("SELECT id FROM files WHERE path = 'C:\\';");
    assert_eq!(score, QualityScore::MAX);
}

#[test]
fn test_mysql_inline_hash_comment() {
    let config = AnalysisConfig {
        dialect: SqlDialect::MySQL,
        ..Default::default()
    };
    let analyzer =
        RuleBasedAnalyzer::with_config(DataTypeRegistry::global(), &config, RulesConfig::default());
    let (findings, _) = analyzer.analyze("SELECT 1 FROM t WHERE id = 1; # it's fine");
    assert!(findings.is_empty());
}
