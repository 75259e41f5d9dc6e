//! SQL dialect identifiers.
//!
//! Dialects are carried as plain identifier strings by the data type
//! registry (`"mysql"`, `"postgresql"`, ...). [`SqlDialect`] normalizes the
//! spellings users actually type (`postgres`, `pg`, `mssql`, ...) to those
//! canonical identifiers and maps each dialect to a `sqlparser` dialect for
//! the optional strict syntax check.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlparser::dialect::{
    Dialect, GenericDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect
};

use crate::error::{AppError, unknown_dialect_error};

/// SQL dialect a document targets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum SqlDialect {
    #[default]
    Generic,
    MySQL,
    PostgreSQL,
    SQLite,
    SqlServer,
    Oracle
}

impl SqlDialect {
    /// Dialects with concrete type catalogs, in registry order
    pub const CONCRETE: [SqlDialect; 5] = [
        Self::MySQL,
        Self::PostgreSQL,
        Self::SQLite,
        Self::SqlServer,
        Self::Oracle
    ];

    /// Canonical identifier used by the type registry
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::MySQL => "mysql",
            Self::PostgreSQL => "postgresql",
            Self::SQLite => "sqlite",
            Self::SqlServer => "sqlserver",
            Self::Oracle => "oracle"
        }
    }

    /// Parse a user-supplied identifier, accepting common aliases
    pub fn parse_lenient(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "generic" | "ansi" | "sql" => Some(Self::Generic),
            "mysql" | "mariadb" => Some(Self::MySQL),
            "postgresql" | "postgres" | "pg" | "pgsql" => Some(Self::PostgreSQL),
            "sqlite" | "sqlite3" => Some(Self::SQLite),
            "sqlserver" | "mssql" | "tsql" | "sql_server" => Some(Self::SqlServer),
            "oracle" | "plsql" => Some(Self::Oracle),
            _ => None
        }
    }

    /// Normalize a dialect identifier to its canonical string form
    pub fn normalize(name: &str) -> Option<&'static str> {
        Self::parse_lenient(name).map(Self::as_str)
    }

    /// Convert to sqlparser dialect for the strict syntax check
    ///
    /// Oracle has no dedicated parser dialect here and falls back to the
    /// generic one.
    pub fn into_parser_dialect(self) -> Box<dyn Dialect> {
        match self {
            Self::Generic | Self::Oracle => Box::new(GenericDialect {}),
            Self::MySQL => Box::new(MySqlDialect {}),
            Self::PostgreSQL => Box::new(PostgreSqlDialect {}),
            Self::SQLite => Box::new(SQLiteDialect {}),
            Self::SqlServer => Box::new(MsSqlDialect {})
        }
    }
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SqlDialect {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_lenient(s).ok_or_else(|| unknown_dialect_error(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_normalize() {
        assert_eq!(SqlDialect::normalize("Postgres"), Some("postgresql"));
        assert_eq!(SqlDialect::normalize("MSSQL"), Some("sqlserver"));
        assert_eq!(SqlDialect::normalize("mariadb"), Some("mysql"));
        assert_eq!(SqlDialect::normalize("db2"), None);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("informix".parse::<SqlDialect>().is_err());
        assert_eq!("sqlite3".parse::<SqlDialect>().ok(), Some(SqlDialect::SQLite));
    }

    #[test]
    fn test_display_matches_as_str() {
        for dialect in SqlDialect::CONCRETE {
            assert_eq!(dialect.to_string(), dialect.as_str());
        }
    }
}
