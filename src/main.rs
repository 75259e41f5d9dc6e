//! # SQL Review
//!
//! Heuristic static review of SQL scripts and schemas.
//!
//! `sql-review` reads SQL text without executing it, recovers table
//! definitions from `CREATE TABLE` statements, runs a table of security,
//! performance, semantic, syntax and schema rules, and reports scored
//! findings with index and type-migration suggestions.
//!
//! # Quick Start
//!
//! ```bash
//! # Review a schema together with the statements that use it
//! sql-review analyze schema.sql queries.sql
//!
//! # Check types against a target dialect and fail CI below a score
//! sql-review analyze --dialect postgresql --min-score 80 migrations/*.sql
//!
//! # CI/CD integration with SARIF output
//! sql-review analyze queries.sql -f sarif > results.sarif
//!
//! # Stream SQL from stdin
//! pg_dump --schema-only mydb | sql-review analyze -
//!
//! # Ask the type registry
//! sql-review types resolve "character varying(20)"
//! sql-review types compatible JSONB --dialect sqlite
//! sql-review types infer 2024-01-01 2024-02-29
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded from (in order of precedence):
//!
//! 1. Command-line arguments
//! 2. Environment variables (`SQL_REVIEW_DIALECT`, `SQL_REVIEW_STRICT`)
//! 3. `--config <FILE>`, or `.sql-review.toml` in the current directory
//! 4. `~/.config/sql-review/config.toml`
//!
//! # Exit Codes
//!
//! - `0` - No findings, or only low severity ones
//! - `1` - Medium findings, or a `types` lookup found nothing
//! - `2` - Critical or high findings, or a score below `--min-score`
//!
//! Hard failures (unreadable, binary or oversized input, broken
//! configuration) print the error and exit with `1`.
//!
//! # Logging
//!
//! Diagnostics go to stderr. The level defaults to `warn`; `-v` raises it
//! to `debug` and `RUST_LOG` overrides both.

use std::{
    io::{self, Write},
    process
};

use clap::Parser;
use sql_review::{
    app::{AnalyzeParams, CommandResult, run_analyze, run_types},
    cli::{Cli, Commands},
    config::Config,
    datatype::DataTypeRegistry,
    error::AppResult
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(cli) {
        Ok(result) => {
            print!("{}", result.output);
            let _ = io::stdout().flush();
            process::exit(result.exit_code);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> AppResult<CommandResult> {
    match cli.command {
        Commands::Analyze {
            files,
            dialect,
            output_format,
            no_color,
            strict,
            min_score
        } => {
            let config = Config::load_from(cli.config.as_deref())?;
            let params = AnalyzeParams {
                files: files.iter().map(|f| f.display().to_string()).collect(),
                dialect,
                output_format,
                no_color,
                strict,
                min_score,
                verbose: cli.verbose
            };
            run_analyze(params, config)
        }
        Commands::Types(command) => Ok(run_types(command, DataTypeRegistry::global()))
    }
}
