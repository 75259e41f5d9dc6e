use super::{LineRule, MatchTarget, RuleCategory, RuleInfo, Severity};

const fn info(id: &'static str, name: &'static str, severity: Severity) -> RuleInfo {
    RuleInfo {
        id,
        name,
        severity,
        category: RuleCategory::Performance
    }
}

/// Functions that hide a column from its index when wrapped around it.
const WRAPPING_FUNCTIONS: &str = "YEAR|MONTH|DAY|DATE|UPPER|LOWER|TRIM|LTRIM|RTRIM|SUBSTRING|SUBSTR|LEFT|RIGHT|CAST|CONVERT|COALESCE|ISNULL|IFNULL|NVL|TO_CHAR|DATE_FORMAT|LENGTH";

pub(super) fn rules() -> Vec<LineRule> {
    vec![
        LineRule::new(
            info("PERF001", "SELECT *", Severity::Medium),
            r"(?i)\bSELECT\s+(?:DISTINCT\s+)?\*",
            "SELECT * fetches every column and breaks when the table changes"
        )
        .suggest("List only the columns you need"),
        LineRule::new(
            info("PERF002", "Leading wildcard", Severity::Medium),
            r"(?i)\bLIKE\s+N?'%",
            "LIKE pattern with a leading wildcard cannot use an index"
        )
        .on(MatchTarget::Raw)
        .suggest("Use full-text search or anchor the pattern at the start"),
        LineRule::new(
            info("PERF003", "Function on column", Severity::Medium),
            &format!(
                r"(?i)\b(?:WHERE|AND|OR|ON)\s+(?:NOT\s+)?(?:{})\s*\(\s*[A-Za-z_][\w.]*\s*(?:[,)]|\bAS\b)",
                WRAPPING_FUNCTIONS
            ),
            "Function call on a column in a predicate prevents index usage"
        )
        .suggest("Rewrite the condition as a range, or add a functional index")
        .confidence(0.8),
        LineRule::new(
            info("PERF004", "Large offset", Severity::Medium),
            r"(?i)\bOFFSET\s+[1-9]\d{3,}\b|\bLIMIT\s+[1-9]\d{3,}\s*,",
            "Large OFFSET still reads and discards every skipped row"
        )
        .suggest("Use keyset pagination (WHERE id > last_seen_id)"),
        LineRule::new(
            info("PERF005", "NOT IN with subquery", Severity::Medium),
            r"(?i)\bNOT\s+IN\s*\(\s*SELECT\b",
            "NOT IN with a subquery is slow and returns no rows if the subquery yields NULL"
        )
        .suggest("Use NOT EXISTS or LEFT JOIN ... IS NULL instead"),
        LineRule::new(
            info("PERF006", "UNION without ALL", Severity::Low),
            r"(?i)\bUNION(?:\s+DISTINCT)?\s*(?:$|SELECT\b|\()",
            "UNION removes duplicates, which requires sorting"
        )
        .suggest("Use UNION ALL if duplicates are acceptable"),
        LineRule::new(
            info("PERF007", "Random ordering", Severity::Medium),
            r"(?i)\bORDER\s+BY\s+(?:RAND|RANDOM|NEWID)\s*\(\s*\)",
            "ORDER BY a random value sorts the whole result set"
        )
        .suggest("Pick random keys in application code or sample with TABLESAMPLE"),
        LineRule::new(
            info("PERF008", "Implicit cross join", Severity::Low),
            r"(?i)\bFROM\s+[\w.$]+(?:\s+(?:AS\s+)?[\w$]+)?\s*,\s*[\w$]",
            "Comma-separated tables without a join condition form a cartesian product"
        )
        .unless(r"(?i)\bWHERE\b")
        .suggest("Use explicit JOIN ... ON syntax")
        .confidence(0.6),
    ]
}
