//! Column fragment parsing.
//!
//! A fragment is one top-level, comma-separated piece of a `CREATE TABLE`
//! body. Fragments that start with a constraint keyword are rejected with
//! [`ParseIssue::Constraint`]; the extractor handles those itself.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::Serialize;

use super::splitter::{find_balanced_span, mask_quoted};

/// Type keywords recognized right after the column name.
const TYPE_VOCABULARY: &[&str] = &[
    "TIMESTAMP WITHOUT TIME ZONE",
    "TIMESTAMP WITH TIME ZONE",
    "TIME WITHOUT TIME ZONE",
    "TIME WITH TIME ZONE",
    "NATIONAL CHARACTER VARYING",
    "CHARACTER VARYING",
    "DOUBLE PRECISION",
    "BIT VARYING",
    "LONG RAW",
    "BIGINT",
    "INTEGER",
    "INT",
    "INT2",
    "INT4",
    "INT8",
    "SMALLINT",
    "TINYINT",
    "MEDIUMINT",
    "BIGSERIAL",
    "SMALLSERIAL",
    "SERIAL",
    "DECIMAL",
    "NUMERIC",
    "NUMBER",
    "DEC",
    "FLOAT",
    "FLOAT4",
    "FLOAT8",
    "DOUBLE",
    "REAL",
    "SMALLMONEY",
    "MONEY",
    "BOOLEAN",
    "BOOL",
    "BIT",
    "NVARCHAR2",
    "VARCHAR2",
    "NVARCHAR",
    "VARCHAR",
    "NCHAR",
    "CHARACTER",
    "CHAR",
    "TINYTEXT",
    "MEDIUMTEXT",
    "LONGTEXT",
    "NTEXT",
    "TEXT",
    "CITEXT",
    "NCLOB",
    "CLOB",
    "DATETIMEOFFSET",
    "SMALLDATETIME",
    "DATETIME2",
    "DATETIME",
    "TIMESTAMPTZ",
    "TIMESTAMP",
    "TIMETZ",
    "TIME",
    "DATE",
    "YEAR",
    "INTERVAL",
    "TINYBLOB",
    "MEDIUMBLOB",
    "LONGBLOB",
    "BLOB",
    "VARBINARY",
    "BINARY",
    "BYTEA",
    "RAW",
    "IMAGE",
    "JSONB",
    "JSON",
    "XML",
    "UNIQUEIDENTIFIER",
    "UUID",
    "INET",
    "CIDR",
    "MACADDR8",
    "MACADDR",
    "GEOGRAPHY",
    "GEOMETRY",
    "LINESTRING",
    "POLYGON",
    "POINT",
    "ENUM",
    "SET",
    "HSTORE",
    "TSVECTOR",
    "ROWID"
];

/// Types whose single size argument is a precision.
const PRECISION_TYPES: &[&str] = &["DECIMAL", "NUMERIC", "NUMBER", "DEC"];

/// Types that imply an auto-incrementing column.
const SERIAL_TYPES: &[&str] = &["SERIAL", "BIGSERIAL", "SMALLSERIAL"];

static NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:`([^`]+)`|"([^"]+)"|\[([^\]]+)\]|([^\s(),]+))"#).expect("valid regex")
});

static TYPE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let mut words = TYPE_VOCABULARY.to_vec();
    words.sort_by_key(|w| std::cmp::Reverse(w.len()));
    let alternation = words
        .iter()
        .map(|w| w.replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)^(?:{})\b", alternation)).expect("valid regex")
});

static ARGS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\(([^()]*)\)").expect("valid regex"));

static NOT_NULL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bNOT\s+NULL\b").expect("valid regex"));

static UNIQUE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bUNIQUE\b").expect("valid regex"));

static PRIMARY_KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bPRIMARY\s+KEY\b").expect("valid regex"));

static AUTO_INCREMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:AUTO_INCREMENT|AUTOINCREMENT|IDENTITY)\b").expect("valid regex")
});

static DEFAULT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bDEFAULT\s+").expect("valid regex"));

static REFERENCES_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\bREFERENCES\s+((?:[\w$]+|`[^`]+`|"[^"]+"|\[[^\]]+\])(?:\.(?:[\w$]+|`[^`]+`|"[^"]+"|\[[^\]]+\]))*)\s*(?:\(\s*([^)]*?)\s*\))?"#
    )
    .expect("valid regex")
});

/// Structured descriptor of one column definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnDefinition {
    /// Column name, unquoted
    pub name:              String,
    /// Upper-cased type keyword as written (`VARCHAR`, `DOUBLE PRECISION`)
    pub declared_type:     String,
    /// Single size argument, e.g. `VARCHAR(255)`
    pub size:              Option<u32>,
    /// Precision and scale, e.g. `DECIMAL(10,2)`
    pub precision_scale:   Option<(u32, u32)>,
    /// `false` when `NOT NULL` or an inline `PRIMARY KEY` is present
    pub nullable:          bool,
    pub is_primary_key:    bool,
    pub is_unique:         bool,
    pub is_auto_increment: bool,
    /// Default value with surrounding quotes removed
    pub default_value:     Option<String>,
    /// Inline `REFERENCES table(column)`
    pub references:        Option<(String, Option<String>)>
}

/// Why a fragment did not produce a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseIssue {
    /// Blank fragment, usually from a doubled or trailing comma
    Empty,
    /// Table-level constraint, handled by the extractor
    Constraint,
    /// Leading identifier found but no recognized type follows it
    UnknownType {
        column: String,
        found:  Option<String>
    }
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty column definition"),
            Self::Constraint => write!(f, "table-level constraint"),
            Self::UnknownType {
                column,
                found: Some(found)
            } => write!(f, "column '{}' has unrecognized type '{}'", column, found),
            Self::UnknownType {
                column,
                found: None
            } => write!(f, "column '{}' has no data type", column)
        }
    }
}

/// Parser for single column fragments.
///
/// Modifier detection is order-independent and runs on quote-masked text,
/// so `DEFAULT 'NOT NULL'` does not make a column non-nullable.
///
/// ```
/// use sql_review::schema::column::ColumnDefinitionParser;
///
/// let col = ColumnDefinitionParser::parse("price DECIMAL(10, 2) NOT NULL DEFAULT '0.00'").unwrap();
/// assert_eq!(col.precision_scale, Some((10, 2)));
/// assert!(!col.nullable);
/// assert_eq!(col.default_value.as_deref(), Some("0.00"));
/// ```
pub struct ColumnDefinitionParser;

impl ColumnDefinitionParser {
    /// Parse a fragment into a column, or say why it is not one.
    pub fn parse(fragment: &str) -> Result<ColumnDefinition, ParseIssue> {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return Err(ParseIssue::Empty);
        }
        if Self::is_constraint(fragment) {
            return Err(ParseIssue::Constraint);
        }
        let name_match = NAME_REGEX.captures(fragment).ok_or(ParseIssue::Empty)?;
        let name = (1..=4)
            .find_map(|i| name_match.get(i))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let after_name = &fragment[name_match.get(0).map_or(0, |m| m.end())..];
        let rest = after_name.trim_start();
        let Some(type_match) = TYPE_REGEX.find(rest) else {
            let found = rest
                .split(|c: char| c.is_whitespace() || c == '(')
                .find(|s| !s.is_empty())
                .map(str::to_string);
            return Err(ParseIssue::UnknownType {
                column: name,
                found
            });
        };
        let declared_type = type_match
            .as_str()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();
        let mut tail = &rest[type_match.end()..];

        let mut column = ColumnDefinition {
            name,
            nullable: true,
            ..Default::default()
        };
        if let Some(args) = ARGS_REGEX.captures(tail) {
            let inner = args.get(1).map_or("", |m| m.as_str());
            apply_type_arguments(&mut column, &declared_type, inner);
            tail = &tail[args.get(0).map_or(0, |m| m.end())..];
        }
        if SERIAL_TYPES.contains(&declared_type.as_str()) {
            column.is_auto_increment = true;
        }
        column.declared_type = declared_type;
        apply_modifiers(&mut column, tail);
        Ok(column)
    }

    /// Nullable-style entry point: `None` for anything that is not a column.
    pub fn parse_column(fragment: &str) -> Option<ColumnDefinition> {
        Self::parse(fragment).ok()
    }

    /// Whether the fragment opens with a table-level constraint keyword.
    ///
    /// `KEY`, `INDEX` and `UNIQUE` are also legal column names, so they
    /// only count as constraints when no type keyword follows them, or when
    /// that keyword is an index name followed by a column list
    /// (`KEY date (created)`).
    pub fn is_constraint(fragment: &str) -> bool {
        let fragment = fragment.trim_start();
        let mut words = fragment.split_whitespace();
        let Some(first) = words.next() else {
            return false;
        };
        let first = first
            .split('(')
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();
        match first.as_str() {
            "CONSTRAINT" | "CHECK" | "FULLTEXT" | "SPATIAL" | "EXCLUDE" => true,
            "PRIMARY" | "FOREIGN" => words
                .next()
                .is_some_and(|w| w.to_ascii_uppercase().starts_with("KEY")),
            "KEY" | "INDEX" | "UNIQUE" => {
                let rest = fragment[first.len()..].trim_start();
                TYPE_REGEX
                    .find(rest)
                    .is_none_or(|m| opens_column_list(&rest[m.end()..]))
            }
            _ => false
        }
    }
}

/// Whether `tail` starts with a parenthesized list of column names rather
/// than type arguments such as `(10)`, `(10, 2)`, `(MAX)` or `('a', 'b')`.
fn opens_column_list(tail: &str) -> bool {
    let Some(inner) = tail.trim_start().strip_prefix('(') else {
        return false;
    };
    inner
        .split(')')
        .next()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .any(|part| {
            part.starts_with(|c: char| c.is_alphabetic() || matches!(c, '_' | '`' | '"' | '['))
                && !part.eq_ignore_ascii_case("max")
        })
}

fn apply_type_arguments(column: &mut ColumnDefinition, declared_type: &str, inner: &str) {
    let numbers: Vec<Option<u32>> = inner.split(',').map(|p| p.trim().parse().ok()).collect();
    match numbers.as_slice() {
        [Some(precision), Some(scale)] => column.precision_scale = Some((*precision, *scale)),
        [Some(n)] if PRECISION_TYPES.contains(&declared_type) => {
            column.precision_scale = Some((*n, 0))
        }
        [Some(n)] => column.size = Some(*n),
        _ => {}
    }
}

fn apply_modifiers(column: &mut ColumnDefinition, tail: &str) {
    let masked = mask_quoted(tail);
    if NOT_NULL_REGEX.is_match(&masked) {
        column.nullable = false;
    }
    if PRIMARY_KEY_REGEX.is_match(&masked) {
        column.is_primary_key = true;
        column.nullable = false;
    }
    if UNIQUE_REGEX.is_match(&masked) {
        column.is_unique = true;
    }
    if AUTO_INCREMENT_REGEX.is_match(&masked) {
        column.is_auto_increment = true;
    }
    if let Some(m) = DEFAULT_REGEX.find(&masked) {
        column.default_value = take_default_value(&tail[m.end()..]);
    }
    if let Some(caps) = REFERENCES_REGEX.captures(&masked) {
        let table = caps.get(1).map(|m| unquote_identifier(m.as_str()));
        let referenced = caps
            .get(2)
            .map(|m| unquote_identifier(m.as_str()))
            .filter(|c| !c.is_empty());
        if let Some(table) = table {
            column.references = Some((table, referenced));
        }
    }
}

/// Read the value following `DEFAULT`.
///
/// Quoted literals lose their quotes (doubled quotes collapse), calls and
/// parenthesized expressions keep their parentheses.
fn take_default_value(s: &str) -> Option<String> {
    let s = s.trim_start();
    let first = s.chars().next()?;
    if first == '\'' || first == '"' {
        let mut value = String::new();
        let mut chars = s[1..].chars().peekable();
        while let Some(c) = chars.next() {
            if c == first {
                if chars.peek() == Some(&first) {
                    value.push(first);
                    chars.next();
                    continue;
                }
                return Some(value);
            }
            value.push(c);
        }
        return Some(value);
    }
    if first == '(' {
        return find_balanced_span(s, 0).map(|(start, end)| s[start..=end].to_string());
    }
    let token_end = s
        .find(|c: char| c.is_whitespace() || c == ',' || c == '(')
        .unwrap_or(s.len());
    let mut end = token_end;
    if s[token_end..].starts_with('(')
        && let Some((_, close)) = find_balanced_span(s, token_end)
    {
        end = close + 1;
    }
    let value = &s[..end];
    (!value.is_empty()).then(|| value.to_string())
}

/// Strip identifier quoting (`"x"`, `` `x` ``, `[x]`) from every dotted part.
pub fn unquote_identifier(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, '"' | '`' | '[' | ']'))
        .collect()
}
