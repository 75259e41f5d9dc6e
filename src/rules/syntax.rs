use std::sync::LazyLock;

use regex::Regex;
use sqlparser::parser::Parser;
use tracing::trace;

use super::{Finding, LineRule, RuleCategory, RuleInfo, Severity, line_text};
use crate::{
    dialect::SqlDialect,
    schema::splitter::{balance, line_at, mask_quoted, split_statements}
};

const fn info(id: &'static str, name: &'static str, severity: Severity) -> RuleInfo {
    RuleInfo {
        id,
        name,
        severity,
        category: RuleCategory::Syntax
    }
}

pub const UNBALANCED_PARENS: RuleInfo = info("SYN101", "Unbalanced parentheses", Severity::High);
pub const UNCLOSED_QUOTE: RuleInfo = info("SYN102", "Unclosed quote", Severity::High);
pub const TRAILING_COMMA: RuleInfo = info("SYN103", "Trailing comma", Severity::Medium);
pub const DOUBLED_COMMA: RuleInfo = info("SYN104", "Doubled comma", Severity::Medium);
pub const PARSER_REJECTED: RuleInfo = info("SYN105", "Rejected by parser", Severity::Low);

pub(super) const STATEMENT_RULES: [RuleInfo; 5] = [
    UNBALANCED_PARENS,
    UNCLOSED_QUOTE,
    TRAILING_COMMA,
    DOUBLED_COMMA,
    PARSER_REJECTED
];

static TRAILING_COMMA_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*\)").expect("valid regex"));

static DOUBLED_COMMA_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*,").expect("valid regex"));

pub(super) fn rules() -> Vec<LineRule> {
    vec![
        LineRule::new(
            info("SYN001", "Misspelled keyword", Severity::High),
            r#"(?i)\b(?:SELCT|SLECT|SELCET|SEELCT|WHRE|WEHRE|WHER|GRUOP|GROPU|ODRER|INSRET|UPDTAE|UPADTE|DELTE|JION|VAULES|VALEUS|LIMT|HAVNIG)\b|\bSELECT\s+.+?\s+FORM\s+[\w.$`"\[\]]+\s*(?:;|$|WHERE\b|JOIN\b|ORDER\b|GROUP\b|LIMIT\b)"#,
            "Possible misspelled SQL keyword"
        )
        .suggest("Check the keyword spelling")
        .confidence(0.7),
    ]
}

/// Structural checks per statement of comment-stripped `text`.
///
/// `original` supplies the snippet text. With `strict` set, balanced
/// statements are also handed to sqlparser in that dialect.
pub(super) fn check_statements(
    text: &str,
    original: &str,
    strict: Option<SqlDialect>
) -> Vec<Finding> {
    let mut findings = Vec::new();
    let parser_dialect = strict.map(SqlDialect::into_parser_dialect);
    for statement in split_statements(text) {
        let line = line_at(text, statement.offset);
        let fragment = line_text(original, line);
        let shape = balance(statement.text);
        if let Some(quote) = shape.unclosed_quote {
            findings.push(
                Finding::new(
                    &UNCLOSED_QUOTE,
                    format!("Statement leaves a {} quote open", quote.as_char())
                )
                .at_line(line)
                .with_fragment(fragment)
                .with_suggestion("Close the quote or escape the embedded quote character")
            );
        } else if shape.depth != 0 || shape.min_depth < 0 {
            let message = if shape.min_depth < 0 {
                "Statement closes a parenthesis that was never opened".to_string()
            } else {
                format!("Statement leaves {} parenthesis(es) open", shape.depth)
            };
            findings.push(
                Finding::new(&UNBALANCED_PARENS, message)
                    .at_line(line)
                    .with_fragment(fragment)
                    .with_suggestion("Balance the parentheses")
            );
        }

        let masked = mask_quoted(statement.text);
        for m in TRAILING_COMMA_REGEX.find_iter(&masked) {
            let at = line_at(text, statement.offset + m.start());
            findings.push(
                Finding::new(&TRAILING_COMMA, "Comma directly before a closing parenthesis")
                    .at_line(at)
                    .with_fragment(line_text(original, at))
                    .with_suggestion("Remove the trailing comma")
            );
        }
        for m in DOUBLED_COMMA_REGEX.find_iter(&masked) {
            let at = line_at(text, statement.offset + m.start());
            findings.push(
                Finding::new(&DOUBLED_COMMA, "Two commas with nothing between them")
                    .at_line(at)
                    .with_fragment(line_text(original, at))
                    .with_suggestion("Remove the extra comma or add the missing item")
            );
        }

        if let Some(dialect) = &parser_dialect
            && shape.is_balanced()
            && let Err(e) = Parser::parse_sql(dialect.as_ref(), statement.text)
        {
            trace!(line, error = %e, "strict parse failed");
            findings.push(
                Finding::new(&PARSER_REJECTED, format!("Parser rejected statement: {}", e))
                    .at_line(line)
                    .with_fragment(fragment)
                    .with_confidence(0.5)
            );
        }
    }
    findings
}
