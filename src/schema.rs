//! Database schema recovery from raw DDL text.
//!
//! This module recovers table structure from `CREATE TABLE` statements
//! without a SQL grammar: statements are located by regex, their column
//! list is isolated with a balanced-parenthesis scan and split at depth
//! zero, and each fragment goes through the
//! [`ColumnDefinitionParser`](column::ColumnDefinitionParser).
//!
//! # Supported Statements
//!
//! - `CREATE [TEMPORARY] TABLE [IF NOT EXISTS]` with columns, types, inline
//!   constraints
//! - Table-level `PRIMARY KEY`, `FOREIGN KEY ... REFERENCES`, `UNIQUE`,
//!   `INDEX`/`KEY` and named `CONSTRAINT` clauses
//! - `CREATE [UNIQUE] INDEX ... ON table (columns)`
//!
//! Everything else is ignored. Malformed statements never abort the
//! extraction; they produce fewer tables or skipped fragments.
//!
//! # Primary key precedence
//!
//! Inline `PRIMARY KEY` on a column and a table-level `PRIMARY KEY (...)`
//! both write [`TableDefinition::primary_key`]. Fragments are applied in
//! source order and the last write wins.
//!
//! # Example
//!
//! ```
//! use sql_review::schema::SchemaExtractor;
//!
//! let sql = r#"
//!     CREATE TABLE users (
//!         id INT PRIMARY KEY,
//!         email VARCHAR(255) NOT NULL
//!     );
//!     CREATE INDEX idx_email ON users(email);
//! "#;
//!
//! let tables = SchemaExtractor::extract(sql);
//! assert_eq!(tables.len(), 1);
//! assert_eq!(tables[0].columns.len(), 2);
//! assert_eq!(tables[0].indexes.len(), 1);
//! ```

pub mod column;
pub mod splitter;

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

pub use self::column::{ColumnDefinition, ColumnDefinitionParser, ParseIssue};
use self::{
    column::unquote_identifier,
    splitter::{find_balanced_span, line_at, split, strip_comments}
};

/// Column name list; keys and indexes rarely exceed a handful of columns
pub type ColumnList = SmallVec<[String; 4]>;

const IDENT: &str = r#"(?:[\w$]+|`[^`]+`|"[^"]+"|\[[^\]]+\])"#;

static CREATE_TABLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\bCREATE\s+(?:OR\s+REPLACE\s+)?(?:(?:GLOBAL|LOCAL)\s+)?(?:TEMP(?:ORARY)?\s+|UNLOGGED\s+)?TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?({id}(?:\s*\.\s*{id})*)\s*\(",
        id = IDENT
    ))
    .expect("valid regex")
});

static CREATE_INDEX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\bCREATE\s+(UNIQUE\s+)?(?:(?:NON)?CLUSTERED\s+)?INDEX\s+(?:CONCURRENTLY\s+)?(?:IF\s+NOT\s+EXISTS\s+)?({id})\s+ON\s+(?:ONLY\s+)?({id}(?:\s*\.\s*{id})*)\s*(?:USING\s+\w+\s*)?\(",
        id = IDENT
    ))
    .expect("valid regex")
});

static CONSTRAINT_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?is)^CONSTRAINT\s+({id})\s+(.*)$", id = IDENT)).expect("valid regex")
});

static PRIMARY_KEY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^PRIMARY\s+KEY\b[^(]*\(([^)]*)\)").expect("valid regex")
});

static FOREIGN_KEY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?is)^FOREIGN\s+KEY\s*(?:{id}\s*)?\(([^)]*)\)\s*REFERENCES\s+({id}(?:\s*\.\s*{id})*)\s*(?:\(([^)]*)\))?",
        id = IDENT
    ))
    .expect("valid regex")
});

static UNIQUE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?is)^UNIQUE\s*(?:(?:KEY|INDEX)\s*)?(?:({id})\s*)?\(([^)]*)\)",
        id = IDENT
    ))
    .expect("valid regex")
});

static INDEX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?is)^(?:FULLTEXT\s+|SPATIAL\s+)?(?:INDEX|KEY)\s*(?:({id})\s*)?(?:USING\s+\w+\s*)?\(([^)]*)\)",
        id = IDENT
    ))
    .expect("valid regex")
});

static INDEX_COLUMN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^({id})", id = IDENT)).expect("valid regex"));

/// Table structure recovered from one `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDefinition {
    /// Table name, unquoted; schema-qualified names keep their dots
    pub name:         String,
    /// Columns in declaration order
    pub columns:      Vec<ColumnDefinition>,
    /// Primary key column(s); last declaration wins
    pub primary_key:  Option<ColumnList>,
    /// Foreign keys in declaration order
    pub foreign_keys: Vec<ForeignKey>,
    /// Inline and `CREATE INDEX` indexes
    pub indexes:      Vec<IndexDefinition>,
    /// 1-based line of the `CREATE TABLE` keyword
    pub line:         usize
}

/// Single-column foreign key reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKey {
    pub column:            String,
    pub referenced_table:  String,
    /// Empty when the DDL omits the column list and the referenced table's
    /// primary key is not known
    pub referenced_column: String
}

/// Index metadata extracted from constraints or `CREATE INDEX`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexDefinition {
    /// Index name (empty for anonymous indexes)
    pub name:    String,
    /// Ordered list of indexed columns
    pub columns: ColumnList,
    pub unique:  bool
}

impl TableDefinition {
    /// Case-insensitive column lookup
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Whether `name` is part of the primary key
    pub fn is_primary_key_column(&self, name: &str) -> bool {
        self.primary_key
            .as_ref()
            .is_some_and(|pk| pk.iter().any(|c| c.eq_ignore_ascii_case(name)))
    }

    /// Whether some index can serve lookups on `column` alone.
    ///
    /// True for the leading column of the primary key or of any index, and
    /// for columns declared `UNIQUE` inline.
    pub fn has_leading_index(&self, column: &str) -> bool {
        let leads = |cols: &ColumnList| cols.first().is_some_and(|c| c.eq_ignore_ascii_case(column));
        self.primary_key.as_ref().is_some_and(leads)
            || self.indexes.iter().any(|idx| leads(&idx.columns))
            || self.column(column).is_some_and(|c| c.is_unique || c.is_primary_key)
    }
}

/// A fragment the column parser gave up on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedFragment {
    pub table:    String,
    pub line:     usize,
    pub fragment: String,
    pub issue:    ParseIssue
}

/// Extraction result including what had to be skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Extraction {
    pub tables:  Vec<TableDefinition>,
    pub skipped: Vec<SkippedFragment>
}

/// Hand-rolled `CREATE TABLE` extractor.
pub struct SchemaExtractor;

impl SchemaExtractor {
    /// Extract all tables in source order.
    pub fn extract(sql: &str) -> Vec<TableDefinition> {
        Self::extract_with_issues(sql).tables
    }

    /// Extract all tables and report skipped fragments.
    pub fn extract_with_issues(sql: &str) -> Extraction {
        let text = strip_comments(sql);
        let mut extraction = Extraction::default();
        for caps in CREATE_TABLE_REGEX.captures_iter(&text) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let name = unquote_identifier(name.as_str());
            let line = line_at(&text, whole.start());
            let open_at = whole.end() - 1;
            let Some((open, close)) = find_balanced_span(&text, open_at) else {
                warn!(table = %name, line, "CREATE TABLE body never closes, skipping");
                continue;
            };
            let body_start = open + 1;
            let table = build_table(
                &text,
                name,
                line,
                body_start,
                &text[body_start..close],
                &mut extraction.skipped
            );
            debug!(
                table = %table.name,
                columns = table.columns.len(),
                foreign_keys = table.foreign_keys.len(),
                "extracted table"
            );
            extraction.tables.push(table);
        }
        attach_create_indexes(&text, &mut extraction.tables);
        resolve_implicit_references(&mut extraction.tables);
        extraction
    }
}

fn build_table(
    text: &str,
    name: String,
    line: usize,
    body_start: usize,
    body: &str,
    skipped: &mut Vec<SkippedFragment>
) -> TableDefinition {
    let mut table = TableDefinition {
        name,
        columns: Vec::new(),
        primary_key: None,
        foreign_keys: Vec::new(),
        indexes: Vec::new(),
        line
    };
    let mut search_from = 0;
    for fragment in split(body, ',') {
        let fragment_line = match body[search_from..].find(fragment.as_str()) {
            Some(pos) if !fragment.is_empty() => {
                search_from += pos + fragment.len();
                line_at(text, body_start + search_from - fragment.len())
            }
            _ => line
        };
        match ColumnDefinitionParser::parse(&fragment) {
            Ok(column) => {
                if column.is_primary_key {
                    table.primary_key = Some(SmallVec::from_iter([column.name.clone()]));
                }
                if let Some((ref_table, ref_column)) = &column.references {
                    table.foreign_keys.push(ForeignKey {
                        column:            column.name.clone(),
                        referenced_table:  ref_table.clone(),
                        referenced_column: ref_column.clone().unwrap_or_default()
                    });
                }
                table.columns.push(column);
            }
            Err(ParseIssue::Constraint) => apply_constraint(&mut table, &fragment, None),
            Err(issue) => {
                warn!(table = %table.name, line = fragment_line, %issue, "skipping column fragment");
                skipped.push(SkippedFragment {
                    table: table.name.clone(),
                    line: fragment_line,
                    fragment,
                    issue
                });
            }
        }
    }
    table
}

fn apply_constraint(table: &mut TableDefinition, fragment: &str, name: Option<String>) {
    if let Some(caps) = CONSTRAINT_NAME_REGEX.captures(fragment) {
        let constraint_name = caps.get(1).map(|m| unquote_identifier(m.as_str()));
        let inner = caps.get(2).map_or("", |m| m.as_str());
        apply_constraint(table, inner.trim(), constraint_name);
        return;
    }
    if let Some(caps) = PRIMARY_KEY_REGEX.captures(fragment) {
        let columns = parse_column_list(caps.get(1).map_or("", |m| m.as_str()));
        if !columns.is_empty() {
            table.primary_key = Some(columns);
        }
        return;
    }
    if let Some(caps) = FOREIGN_KEY_REGEX.captures(fragment) {
        let local = parse_column_list(caps.get(1).map_or("", |m| m.as_str()));
        let referenced_table = caps
            .get(2)
            .map(|m| unquote_identifier(m.as_str()))
            .unwrap_or_default();
        let remote = caps
            .get(3)
            .map(|m| parse_column_list(m.as_str()))
            .unwrap_or_default();
        for (i, column) in local.into_iter().enumerate() {
            table.foreign_keys.push(ForeignKey {
                column,
                referenced_table: referenced_table.clone(),
                referenced_column: remote.get(i).cloned().unwrap_or_default()
            });
        }
        return;
    }
    if let Some(caps) = UNIQUE_REGEX.captures(fragment) {
        push_index(table, &caps, name, true);
        return;
    }
    if let Some(caps) = INDEX_REGEX.captures(fragment) {
        push_index(table, &caps, name, false);
        return;
    }
    trace!(table = %table.name, fragment, "ignoring constraint");
}

fn push_index(
    table: &mut TableDefinition,
    caps: &regex::Captures<'_>,
    name: Option<String>,
    unique: bool
) {
    let columns = parse_column_list(caps.get(2).map_or("", |m| m.as_str()));
    if columns.is_empty() {
        return;
    }
    let name = caps
        .get(1)
        .map(|m| unquote_identifier(m.as_str()))
        .or(name)
        .unwrap_or_default();
    table.indexes.push(IndexDefinition {
        name,
        columns,
        unique
    });
}

/// Column names of an index or key list, ignoring sort order and prefix
/// lengths (`name(20) DESC` -> `name`).
fn parse_column_list(list: &str) -> ColumnList {
    split(list, ',')
        .iter()
        .filter_map(|part| INDEX_COLUMN_REGEX.find(part))
        .map(|m| unquote_identifier(m.as_str()))
        .filter(|c| !c.is_empty())
        .collect()
}

fn attach_create_indexes(text: &str, tables: &mut [TableDefinition]) {
    for caps in CREATE_INDEX_REGEX.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let table_name = caps
            .get(3)
            .map(|m| unquote_identifier(m.as_str()))
            .unwrap_or_default();
        let Some(table) = tables
            .iter_mut()
            .find(|t| t.name.eq_ignore_ascii_case(&table_name))
        else {
            debug!(table = %table_name, "index on unknown table ignored");
            continue;
        };
        let Some((open, close)) = find_balanced_span(text, whole.end() - 1) else {
            continue;
        };
        let columns = parse_column_list(&text[open + 1..close]);
        if columns.is_empty() {
            continue;
        }
        table.indexes.push(IndexDefinition {
            name: caps
                .get(2)
                .map(|m| unquote_identifier(m.as_str()))
                .unwrap_or_default(),
            columns,
            unique: caps.get(1).is_some()
        });
    }
}

/// Fill omitted referenced columns with the target's single-column key.
fn resolve_implicit_references(tables: &mut [TableDefinition]) {
    let keys: Vec<(String, Option<String>)> = tables
        .iter()
        .map(|t| {
            let pk = t
                .primary_key
                .as_ref()
                .filter(|pk| pk.len() == 1)
                .map(|pk| pk[0].clone());
            (t.name.clone(), pk)
        })
        .collect();
    for table in tables.iter_mut() {
        for fk in table
            .foreign_keys
            .iter_mut()
            .filter(|fk| fk.referenced_column.is_empty())
        {
            if let Some((_, Some(pk))) = keys
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(&fk.referenced_table))
            {
                fk.referenced_column = pk.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_count_matches_non_constraint_fragments() {
        let sql = "CREATE TABLE t (a INT, b TEXT, PRIMARY KEY (a), c DATE)";
        let tables = SchemaExtractor::extract(sql);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].name, "t");
        assert_eq!(tables[0].columns.len(), 3);
    }

    #[test]
    fn test_last_primary_key_declaration_wins() {
        let sql = "CREATE TABLE t (a INT PRIMARY KEY, b INT, PRIMARY KEY (b))";
        let tables = SchemaExtractor::extract(sql);
        assert_eq!(tables[0].primary_key.as_ref().unwrap()[0], "b");

        let sql = "CREATE TABLE t (PRIMARY KEY (b), a INT PRIMARY KEY, b INT)";
        let tables = SchemaExtractor::extract(sql);
        assert_eq!(tables[0].primary_key.as_ref().unwrap()[0], "a");
    }

    #[test]
    fn test_composite_primary_key() {
        let sql = "CREATE TABLE m (a INT, b INT, CONSTRAINT pk_m PRIMARY KEY (a, b))";
        let pk = SchemaExtractor::extract(sql)[0].primary_key.clone().unwrap();
        assert_eq!(pk.len(), 2);
        assert_eq!(pk[1], "b");
    }

    #[test]
    fn test_inline_index_constraints() {
        let sql = r#"CREATE TABLE t (
            id INT,
            email VARCHAR(100),
            name VARCHAR(50),
            UNIQUE KEY uk_email (email),
            KEY idx_name (name(10) DESC)
        )"#;
        let table = &SchemaExtractor::extract(sql)[0];
        assert_eq!(table.indexes.len(), 2);
        assert!(table.indexes[0].unique);
        assert_eq!(table.indexes[0].name, "uk_email");
        assert_eq!(table.indexes[1].columns[0], "name");
        assert!(table.has_leading_index("email"));
        assert!(!table.has_leading_index("id"));
    }

    #[test]
    fn test_skipped_fragment_recorded() {
        let sql = "CREATE TABLE t (\n  id INT,\n  geom WEIRDTYPE,\n  name TEXT\n)";
        let extraction = SchemaExtractor::extract_with_issues(sql);
        assert_eq!(extraction.tables[0].columns.len(), 2);
        assert_eq!(extraction.skipped.len(), 1);
        assert_eq!(extraction.skipped[0].line, 3);
        assert_eq!(extraction.skipped[0].fragment, "geom WEIRDTYPE");
    }

    #[test]
    fn test_unclosed_table_is_ignored() {
        let sql = "CREATE TABLE broken (id INT, name TEXT;\nCREATE TABLE ok (id INT);";
        let tables = SchemaExtractor::extract(sql);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].name, "ok");
    }

    #[test]
    fn test_commented_out_table_ignored() {
        let sql = "-- CREATE TABLE ghost (id INT);\nCREATE TABLE real_one (id INT);";
        let tables = SchemaExtractor::extract(sql);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].name, "real_one");
        assert_eq!(tables[0].line, 2);
    }

    #[test]
    fn test_implicit_referenced_column_resolved() {
        let sql = r#"
            CREATE TABLE orders (id INT, user_id INT, FOREIGN KEY (user_id) REFERENCES users);
            CREATE TABLE users (uid INT PRIMARY KEY);
        "#;
        let tables = SchemaExtractor::extract(sql);
        assert_eq!(tables[0].foreign_keys[0].referenced_column, "uid");
    }
}
