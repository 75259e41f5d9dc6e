use regex::Captures;

use super::{LineRule, MatchTarget, RuleCategory, RuleInfo, Severity};

const fn info(id: &'static str, name: &'static str, severity: Severity) -> RuleInfo {
    RuleInfo {
        id,
        name,
        severity,
        category: RuleCategory::Security
    }
}

pub(super) fn rules() -> Vec<LineRule> {
    vec![
        LineRule::new(
            info("SEC001", "DELETE without WHERE", Severity::Critical),
            r#"(?i)\bDELETE\s+FROM\s+[\w.$`"\[\]]+\s*;"#,
            "DELETE without WHERE removes every row in the table"
        )
        .unless(r"(?i)\bWHERE\b")
        .suggest("Add a WHERE clause, or use TRUNCATE if emptying the table is intended"),
        LineRule::new(
            info("SEC002", "UPDATE without WHERE", Severity::Critical),
            r"(?i)\bUPDATE\s+\S+\s+SET\b[^;]*;",
            "UPDATE without WHERE modifies every row in the table"
        )
        .unless(r"(?i)\bWHERE\b")
        .suggest("Add a WHERE clause to limit the affected rows"),
        LineRule::new(
            info("SEC003", "DROP statement", Severity::High),
            r"(?i)\bDROP\s+(?:TABLE|DATABASE|SCHEMA)\b",
            "DROP permanently removes the object and its data"
        )
        .suggest("Make sure a backup exists and the statement runs in a reviewed migration"),
        LineRule::new(
            info("SEC004", "TRUNCATE statement", Severity::High),
            r#"(?i)\bTRUNCATE\s+(?:TABLE\s+)?[\w`"\[]"#,
            "TRUNCATE removes all rows and usually cannot be rolled back"
        )
        .suggest("Use DELETE with WHERE for partial removal, and back up before truncating"),
        LineRule::new(
            info("SEC005", "Tautological condition", Severity::Critical),
            r"(?i)\bOR\s+(?:(\d+)\s*=\s*(\d+)\b|'([^']*)'\s*=\s*'([^']*)')",
            "Always-true OR condition is a classic SQL injection pattern"
        )
        .on(MatchTarget::Raw)
        .confirm(is_tautology)
        .suggest("Use parameterized queries and remove the always-true condition")
        .confidence(0.9),
        LineRule::new(
            info("SEC006", "GRANT ALL", Severity::High),
            r"(?i)\bGRANT\s+ALL\b",
            "GRANT ALL gives far more privileges than most roles need"
        )
        .suggest("Grant only the privileges the role requires"),
        LineRule::new(
            info("SEC007", "Hardcoded password", Severity::High),
            r"(?i)\b\w*(?:password|passwd|pwd)\w*\s*(?:=|<>|!=)\s*'[^']+'|\bIDENTIFIED\s+BY\s+'[^']+'",
            "Password literal embedded in SQL"
        )
        .on(MatchTarget::Raw)
        .suggest("Pass credentials as bind parameters and store only password hashes")
        .confidence(0.8),
        LineRule::new(
            info("SEC008", "Dynamic SQL concatenation", Severity::Medium),
            r"(?i)(?:\bEXEC(?:UTE)?\s*\(|\bEXECUTE\s+IMMEDIATE\b|\bsp_executesql\b).*(?:\|\||\+\s*@|@\w+\s*\+|\+\s*'|'\s*\+|\bCONCAT\s*\()",
            "Dynamic SQL built by string concatenation is open to injection"
        )
        .suggest("Use bind variables or sp_executesql parameters instead of concatenation")
        .confidence(0.7),
    ]
}

/// Both sides of the comparison are the same literal.
fn is_tautology(caps: &Captures<'_>) -> bool {
    match (caps.get(1), caps.get(2)) {
        (Some(left), Some(right)) => left.as_str() == right.as_str(),
        _ => caps.get(3).map(|m| m.as_str()) == caps.get(4).map(|m| m.as_str())
    }
}
