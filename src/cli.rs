use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::datatype::DataTypeCategory;

/// SQL Review - Heuristic static review of SQL scripts and schemas
#[derive(Parser, Debug)]
#[command(name = "sql-review")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file used instead of the default locations
    #[arg(long, global = true, env = "SQL_REVIEW_CONFIG")]
    pub config: Option<PathBuf>
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Review SQL files (schema and statements in any mix)
    Analyze {
        /// SQL files to review (use - for stdin)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Target dialect for type checks and the strict parser pass
        #[arg(long, value_enum)]
        dialect: Option<Dialect>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        output_format: Format,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Also parse every statement with sqlparser
        #[arg(long)]
        strict: bool,

        /// Fail when a quality score falls below this value
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        min_score: Option<u8>
    },

    /// Query the data type registry
    #[command(subcommand)]
    Types(TypesCommand)
}

#[derive(Subcommand, Debug)]
pub enum TypesCommand {
    /// Resolve a type name or alias to its canonical descriptor
    Resolve {
        /// Type name, e.g. "int4" or "character varying(20)"
        name: String
    },

    /// List registered types
    List {
        /// Only types of this category
        #[arg(long)]
        category: Option<DataTypeCategory>,

        /// Only types supported by this dialect
        #[arg(long, value_enum)]
        dialect: Option<Dialect>
    },

    /// Types of a dialect that can hold values of the given type
    Compatible {
        /// Source type name
        #[arg(value_name = "TYPE")]
        type_name: String,

        /// Target dialect
        #[arg(long, value_enum)]
        dialect: Dialect
    },

    /// Infer column types from sample values
    Infer {
        /// Sample values
        #[arg(required = true)]
        values: Vec<String>,

        /// Only types supported by this dialect
        #[arg(long, value_enum)]
        dialect: Option<Dialect>
    },

    /// Conversion path between two types
    Path {
        source: String,
        target: String
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Dialect {
    #[value(alias = "ansi")]
    Generic,
    #[value(alias = "mariadb")]
    Mysql,
    #[value(aliases = ["postgres", "pg"])]
    Postgresql,
    Sqlite,
    #[value(alias = "mssql")]
    Sqlserver,
    Oracle
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Yaml,
    Sarif
}
