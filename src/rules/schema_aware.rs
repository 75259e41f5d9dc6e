//! Checks that need the recovered schema.
//!
//! Table design problems (keys, duplicate columns, unparseable fragments),
//! type problems resolved through the [`DataTypeRegistry`] and predicate
//! columns that no index covers.

use std::{collections::HashSet, sync::LazyLock};

use regex::Regex;

use super::{Finding, RuleCategory, RuleInfo, Severity, line_text};
use crate::{
    datatype::{DataTypeRegistry, SampleFormat},
    schema::{
        Extraction, ParseIssue, TableDefinition,
        column::unquote_identifier,
        splitter::{line_at, mask_quoted, split_statements}
    }
};

const fn info(
    id: &'static str,
    name: &'static str,
    severity: Severity,
    category: RuleCategory
) -> RuleInfo {
    RuleInfo {
        id,
        name,
        severity,
        category
    }
}

pub const MISSING_PRIMARY_KEY: RuleInfo =
    info("SCH001", "Table without primary key", Severity::Medium, RuleCategory::Semantic);
pub const PRIMARY_KEY_UNKNOWN_COLUMN: RuleInfo =
    info("SCH002", "Primary key names unknown column", Severity::High, RuleCategory::Semantic);
pub const FOREIGN_KEY_UNKNOWN_COLUMN: RuleInfo =
    info("SCH003", "Foreign key column missing", Severity::High, RuleCategory::Semantic);
pub const FOREIGN_KEY_UNKNOWN_TABLE: RuleInfo =
    info("SCH004", "Foreign key to undeclared table", Severity::Low, RuleCategory::Semantic);
pub const FOREIGN_KEY_UNKNOWN_TARGET: RuleInfo = info(
    "SCH005",
    "Foreign key to missing column",
    Severity::Medium,
    RuleCategory::Semantic
);
pub const UNPARSEABLE_COLUMN: RuleInfo =
    info("SCH006", "Unparseable column definition", Severity::Medium, RuleCategory::Syntax);
pub const UNKNOWN_TYPE: RuleInfo =
    info("SCH007", "Unknown data type", Severity::Low, RuleCategory::Semantic);
pub const UNSUPPORTED_TYPE: RuleInfo =
    info("SCH008", "Type unsupported by dialect", Severity::Medium, RuleCategory::Semantic);
pub const FLOAT_MONEY: RuleInfo =
    info("SCH009", "Floating point money column", Severity::Medium, RuleCategory::Semantic);
pub const DUPLICATE_COLUMN: RuleInfo =
    info("SCH010", "Duplicate column", Severity::High, RuleCategory::Syntax);
pub const MISSING_INDEX: RuleInfo = info(
    "SCH011",
    "Missing index on predicate column",
    Severity::Medium,
    RuleCategory::Performance
);

pub(super) const RULES: [RuleInfo; 11] = [
    MISSING_PRIMARY_KEY,
    PRIMARY_KEY_UNKNOWN_COLUMN,
    FOREIGN_KEY_UNKNOWN_COLUMN,
    FOREIGN_KEY_UNKNOWN_TABLE,
    FOREIGN_KEY_UNKNOWN_TARGET,
    UNPARSEABLE_COLUMN,
    UNKNOWN_TYPE,
    UNSUPPORTED_TYPE,
    FLOAT_MONEY,
    DUPLICATE_COLUMN,
    MISSING_INDEX
];

const TABLE_NAME: &str = r#"(?:[\w$]+|`[^`]+`|"[^"]+"|\[[^\]]+\])(?:\.(?:[\w$]+|`[^`]+`|"[^"]+"|\[[^\]]+\]))*"#;

static DML_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(?:WITH|SELECT|UPDATE|DELETE)\b").expect("valid regex"));

static TABLE_REF_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:FROM|JOIN|UPDATE)\s+({name})(?:\s+(?:AS\s+)?([A-Za-z_]\w*))?",
        name = TABLE_NAME
    ))
    .expect("valid regex")
});

static PREDICATE_START_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:WHERE|ON)\b").expect("valid regex"));

static COMPARISON_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\b([A-Za-z_]\w*)\.)?\b([A-Za-z_]\w*)\s*(?:=|<>|!=|<=|>=|<|>)\s*(?:([A-Za-z_]\w*)\.)?([A-Za-z_]\w*)?"
    )
    .expect("valid regex")
});

static MEMBERSHIP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\b([A-Za-z_]\w*)\.)?\b([A-Za-z_]\w*)\s+(?:NOT\s+)?(?:IN|LIKE|BETWEEN|IS)\b")
        .expect("valid regex")
});

static MONEY_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:price|amount|cost|total|balance|salary|fee|payment|money|revenue)")
        .expect("valid regex")
});

/// Words that look like tables after `FROM`/`JOIN` but are not aliases.
const NOT_ALIASES: &[&str] = &[
    "WHERE", "ON", "JOIN", "INNER", "LEFT", "RIGHT", "FULL", "CROSS", "OUTER", "SET", "GROUP",
    "ORDER", "LIMIT", "USING", "NATURAL", "UNION", "HAVING", "OFFSET"
];

/// Everything the schema checks read.
pub(super) struct SchemaInput<'a> {
    /// Comment-stripped input
    pub text:       &'a str,
    /// Untouched input, for snippets
    pub original:   &'a str,
    pub extraction: &'a Extraction,
    pub registry:   &'a DataTypeRegistry,
    /// Canonical target dialect, `None` for generic SQL
    pub dialect:    Option<&'static str>
}

pub(super) fn check(input: &SchemaInput<'_>) -> Vec<Finding> {
    let mut findings = Vec::new();
    let tables = &input.extraction.tables;
    for table in tables {
        check_keys(input, table, &mut findings);
        check_columns(input, table, &mut findings);
    }
    for skipped in &input.extraction.skipped {
        if let ParseIssue::UnknownType {
            column, ..
        } = &skipped.issue
        {
            findings.push(
                Finding::new(
                    &UNPARSEABLE_COLUMN,
                    format!("Column definition in '{}' could not be parsed: {}", skipped.table, skipped.issue)
                )
                .at_line(skipped.line)
                .with_fragment(skipped.fragment.as_str())
                .with_suggestion("Check the column type spelling")
                .with_target(skipped.table.as_str(), column.as_str())
            );
        }
    }
    check_predicate_indexes(input, &mut findings);
    findings
}

fn check_keys(input: &SchemaInput<'_>, table: &TableDefinition, findings: &mut Vec<Finding>) {
    let header = line_text(input.original, table.line);
    match &table.primary_key {
        None => findings.push(
            Finding::new(&MISSING_PRIMARY_KEY, format!("Table '{}' has no primary key", table.name))
                .at_line(table.line)
                .with_fragment(header)
                .with_suggestion("Add a PRIMARY KEY so rows can be identified and replicated")
        ),
        Some(pk) => {
            for column in pk.iter().filter(|c| table.column(c).is_none()) {
                findings.push(
                    Finding::new(
                        &PRIMARY_KEY_UNKNOWN_COLUMN,
                        format!("Primary key of '{}' names unknown column '{}'", table.name, column)
                    )
                    .at_line(table.line)
                    .with_fragment(header)
                    .with_target(table.name.as_str(), column.as_str())
                );
            }
        }
    }
    for fk in &table.foreign_keys {
        if table.column(&fk.column).is_none() {
            findings.push(
                Finding::new(
                    &FOREIGN_KEY_UNKNOWN_COLUMN,
                    format!("Foreign key column '{}' does not exist in '{}'", fk.column, table.name)
                )
                .at_line(table.line)
                .with_fragment(header)
                .with_target(table.name.as_str(), fk.column.as_str())
            );
        }
        let referenced = input
            .extraction
            .tables
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(&fk.referenced_table));
        match referenced {
            None => findings.push(
                Finding::new(
                    &FOREIGN_KEY_UNKNOWN_TABLE,
                    format!(
                        "Foreign key '{}.{}' references table '{}' not declared in this input",
                        table.name, fk.column, fk.referenced_table
                    )
                )
                .at_line(table.line)
                .with_fragment(header)
                .with_confidence(0.5)
                .with_target(table.name.as_str(), fk.column.as_str())
            ),
            Some(target)
                if !fk.referenced_column.is_empty()
                    && target.column(&fk.referenced_column).is_none() =>
            {
                findings.push(
                    Finding::new(
                        &FOREIGN_KEY_UNKNOWN_TARGET,
                        format!(
                            "Foreign key '{}.{}' references missing column '{}.{}'",
                            table.name, fk.column, target.name, fk.referenced_column
                        )
                    )
                    .at_line(table.line)
                    .with_fragment(header)
                    .with_target(table.name.as_str(), fk.column.as_str())
                );
            }
            Some(_) => {}
        }
    }
}

fn check_columns(input: &SchemaInput<'_>, table: &TableDefinition, findings: &mut Vec<Finding>) {
    let header = line_text(input.original, table.line);
    let mut seen = HashSet::new();
    for column in &table.columns {
        if !seen.insert(column.name.to_lowercase()) {
            findings.push(
                Finding::new(
                    &DUPLICATE_COLUMN,
                    format!("Column '{}' is declared more than once in '{}'", column.name, table.name)
                )
                .at_line(table.line)
                .with_fragment(header)
                .with_target(table.name.as_str(), column.name.as_str())
            );
        }
        let Some(descriptor) = input.registry.resolve(&column.declared_type) else {
            findings.push(
                Finding::new(
                    &UNKNOWN_TYPE,
                    format!("Type '{}' of '{}.{}' is not known", column.declared_type, table.name, column.name)
                )
                .at_line(table.line)
                .with_fragment(header)
                .with_target(table.name.as_str(), column.name.as_str())
            );
            continue;
        };
        if let Some(dialect) = input.dialect
            && !descriptor.supports(dialect)
        {
            let mut finding = Finding::new(
                &UNSUPPORTED_TYPE,
                format!(
                    "Type '{}' of '{}.{}' is not available in {}",
                    column.declared_type, table.name, column.name, dialect
                )
            )
            .at_line(table.line)
            .with_fragment(header)
            .with_target(table.name.as_str(), column.name.as_str());
            if let Some(alternative) = input
                .registry
                .find_compatible(&descriptor.canonical_name, dialect)
                .first()
            {
                finding = finding.with_suggestion(format!("Use {} instead", alternative.canonical_name));
            }
            findings.push(finding);
        }
        if descriptor.sample_format == Some(SampleFormat::Float)
            && MONEY_NAME_REGEX.is_match(&column.name)
        {
            findings.push(
                Finding::new(
                    &FLOAT_MONEY,
                    format!(
                        "Monetary column '{}.{}' uses floating type {}",
                        table.name, column.name, column.declared_type
                    )
                )
                .at_line(table.line)
                .with_fragment(header)
                .with_suggestion("Use DECIMAL/NUMERIC with an explicit scale for money")
                .with_confidence(0.8)
                .with_target(table.name.as_str(), column.name.as_str())
            );
        }
    }
}

/// Flag WHERE/ON columns of known tables that no index leads with.
fn check_predicate_indexes(input: &SchemaInput<'_>, findings: &mut Vec<Finding>) {
    let tables = &input.extraction.tables;
    if tables.is_empty() {
        return;
    }
    for statement in split_statements(input.text) {
        if !DML_REGEX.is_match(statement.text) {
            continue;
        }
        let masked = mask_quoted(statement.text);
        let refs = table_refs(&masked, tables);
        if refs.is_empty() {
            continue;
        }
        let Some(start) = PREDICATE_START_REGEX.find(&masked).map(|m| m.start()) else {
            continue;
        };
        let predicates = &masked[start..];
        let mut reported = HashSet::new();
        let mut candidates: Vec<(usize, Option<&str>, &str)> = Vec::new();
        for caps in COMPARISON_REGEX.captures_iter(predicates) {
            if let Some(column) = caps.get(2) {
                candidates.push((column.start(), caps.get(1).map(|m| m.as_str()), column.as_str()));
            }
            if let Some(column) = caps.get(4) {
                candidates.push((column.start(), caps.get(3).map(|m| m.as_str()), column.as_str()));
            }
        }
        for caps in MEMBERSHIP_REGEX.captures_iter(predicates) {
            if let Some(column) = caps.get(2) {
                candidates.push((column.start(), caps.get(1).map(|m| m.as_str()), column.as_str()));
            }
        }
        candidates.sort_by_key(|(pos, ..)| *pos);
        for (pos, qualifier, column) in candidates {
            let Some(table) = resolve_column(&refs, qualifier, column) else {
                continue;
            };
            if table.has_leading_index(column)
                || !reported.insert((table.name.to_lowercase(), column.to_lowercase()))
            {
                continue;
            }
            let line = line_at(input.text, statement.offset + start + pos);
            let column_name = table
                .column(column)
                .map_or(column, |c| c.name.as_str());
            findings.push(
                Finding::new(
                    &MISSING_INDEX,
                    format!("Column '{}.{}' is filtered on but not indexed", table.name, column_name)
                )
                .at_line(line)
                .with_fragment(line_text(input.original, line))
                .with_suggestion(format!(
                    "CREATE INDEX idx_{}_{} ON {} ({})",
                    table.name.replace('.', "_"),
                    column_name,
                    table.name,
                    column_name
                ))
                .with_confidence(0.7)
                .with_target(table.name.as_str(), column_name)
            );
        }
    }
}

/// Known tables referenced by a statement, with their aliases.
fn table_refs<'t>(
    masked: &str,
    tables: &'t [TableDefinition]
) -> Vec<(&'t TableDefinition, Option<String>)> {
    let mut refs = Vec::new();
    let mut at = 0;
    // resume after the table name so a keyword taken as alias can still
    // start the next reference (`FROM a JOIN b`)
    while let Some(caps) = TABLE_REF_REGEX.captures_at(masked, at) {
        let Some(name) = caps.get(1) else {
            break;
        };
        at = name.end();
        let name = unquote_identifier(name.as_str());
        let Some(table) = tables.iter().find(|t| t.name.eq_ignore_ascii_case(&name)) else {
            continue;
        };
        let alias = caps
            .get(2)
            .map(|m| m.as_str())
            .filter(|a| !NOT_ALIASES.iter().any(|k| k.eq_ignore_ascii_case(a)))
            .map(str::to_string);
        refs.push((table, alias));
    }
    refs
}

fn resolve_column<'t>(
    refs: &[(&'t TableDefinition, Option<String>)],
    qualifier: Option<&str>,
    column: &str
) -> Option<&'t TableDefinition> {
    match qualifier {
        Some(q) => refs
            .iter()
            .find(|(table, alias)| {
                alias.as_deref().is_some_and(|a| a.eq_ignore_ascii_case(q))
                    || table.name.eq_ignore_ascii_case(q)
            })
            .map(|(table, _)| *table)
            .filter(|table| table.column(column).is_some()),
        None => refs
            .iter()
            .map(|(table, _)| *table)
            .find(|table| table.column(column).is_some())
    }
}
