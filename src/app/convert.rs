//! Conversion of CLI-facing enums to library types.

use crate::{
    cli::{Dialect, Format},
    dialect::SqlDialect,
    output::OutputFormat
};

/// Converts a CLI dialect to the library dialect.
///
/// ```
/// use sql_review::{app::convert_dialect, cli::Dialect, dialect::SqlDialect};
///
/// assert_eq!(convert_dialect(Dialect::Sqlserver), SqlDialect::SqlServer);
/// ```
pub fn convert_dialect(dialect: Dialect) -> SqlDialect {
    match dialect {
        Dialect::Generic => SqlDialect::Generic,
        Dialect::Mysql => SqlDialect::MySQL,
        Dialect::Postgresql => SqlDialect::PostgreSQL,
        Dialect::Sqlite => SqlDialect::SQLite,
        Dialect::Sqlserver => SqlDialect::SqlServer,
        Dialect::Oracle => SqlDialect::Oracle
    }
}

/// Converts a CLI format to the renderer's output format
pub fn convert_format(format: Format) -> OutputFormat {
    match format {
        Format::Text => OutputFormat::Text,
        Format::Json => OutputFormat::Json,
        Format::Yaml => OutputFormat::Yaml,
        Format::Sarif => OutputFormat::Sarif
    }
}
