use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{LineRule, RuleCategory, RuleInfo, Severity};

static ASSIGNMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:SET|UPDATE)\b").expect("valid regex"));

const fn info(id: &'static str, name: &'static str, severity: Severity) -> RuleInfo {
    RuleInfo {
        id,
        name,
        severity,
        category: RuleCategory::Semantic
    }
}

/// `= NULL` that follows `SET`/`UPDATE` is an assignment, as in
/// `ON CONFLICT ... DO UPDATE SET b = NULL` or `ON DUPLICATE KEY UPDATE b = NULL`.
fn compares_outside_assignment(caps: &Captures<'_>) -> bool {
    caps.name("between")
        .is_none_or(|m| !ASSIGNMENT_REGEX.is_match(m.as_str()))
}

pub(super) fn rules() -> Vec<LineRule> {
    vec![
        LineRule::new(
            info("SEM001", "Comparison with NULL", Severity::High),
            r#"(?i)\b(?:WHERE|AND|OR|ON|HAVING|WHEN)\b(?P<between>[^;]*?)[\w)\]"`]\s*(?:=|!=|<>)\s*NULL\b"#,
            "Comparing with NULL using = or <> is never true"
        )
        .confirm(compares_outside_assignment)
        .suggest("Use IS NULL or IS NOT NULL"),
        LineRule::new(
            info("SEM002", "INSERT without column list", Severity::Medium),
            r#"(?i)\bINSERT\s+(?:INTO\s+)?[\w.$`"\[\]]+\s+VALUES?\b"#,
            "INSERT without a column list depends on the table's column order"
        )
        .suggest("Name the target columns explicitly"),
        LineRule::new(
            info("SEM003", "Positional ORDER BY / GROUP BY", Severity::Low),
            r"(?i)\b(?:ORDER|GROUP)\s+BY\s+\d+\b",
            "Positional references silently change meaning when the select list changes"
        )
        .suggest("Refer to columns by name or alias"),
    ]
}
