// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use clap::Parser;
use sql_review::{
    cli::{Cli, Commands, Dialect, Format, TypesCommand},
    datatype::DataTypeCategory
};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("sql-review").chain(args.iter().copied())).unwrap()
}

#[test]
fn test_analyze_defaults() {
    let cli = parse(&["analyze", "schema.sql"]);
    assert!(!cli.verbose);
    match cli.command {
        Commands::Analyze {
            files,
            dialect,
            output_format,
            no_color,
            strict,
            min_score
        } => {
            assert_eq!(files, vec![PathBuf::from("schema.sql")]);
            assert_eq!(dialect, None);
            assert_eq!(output_format, Format::Text);
            assert!(!no_color);
            assert!(!strict);
            assert_eq!(min_score, None);
        }
        Commands::Types(_) => panic!("expected analyze")
    }
}

#[test]
fn test_analyze_all_flags() {
    let cli = parse(&[
        "analyze",
        "a.sql",
        "-",
        "--dialect",
        "postgres",
        "-f",
        "sarif",
        "--no-color",
        "--strict",
        "--min-score",
        "80",
        "-v"
    ]);
    assert!(cli.verbose);
    match cli.command {
        Commands::Analyze {
            files,
            dialect,
            output_format,
            no_color,
            strict,
            min_score
        } => {
            assert_eq!(files.len(), 2);
            assert_eq!(dialect, Some(Dialect::Postgresql));
            assert_eq!(output_format, Format::Sarif);
            assert!(no_color);
            assert!(strict);
            assert_eq!(min_score, Some(80));
        }
        Commands::Types(_) => panic!("expected analyze")
    }
}

#[test]
fn test_dialect_aliases() {
    for (alias, expected) in [
        ("pg", Dialect::Postgresql),
        ("mssql", Dialect::Sqlserver),
        ("mariadb", Dialect::Mysql),
        ("ansi", Dialect::Generic)
    ] {
        match parse(&["analyze", "a.sql", "--dialect", alias]).command {
            Commands::Analyze {
                dialect, ..
            } => assert_eq!(dialect, Some(expected)),
            Commands::Types(_) => panic!("expected analyze")
        }
    }
}

#[test]
fn test_analyze_rejects_bad_input() {
    assert!(Cli::try_parse_from(["sql-review", "analyze"]).is_err());
    assert!(Cli::try_parse_from(["sql-review", "analyze", "a.sql", "--min-score", "101"]).is_err());
    assert!(Cli::try_parse_from(["sql-review", "analyze", "a.sql", "--dialect", "db2"]).is_err());
    assert!(Cli::try_parse_from(["sql-review", "analyze", "a.sql", "-f", "xml"]).is_err());
}

#[test]
fn test_global_config_flag() {
    let cli = parse(&["types", "resolve", "int4", "--config", "custom.toml"]);
    assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
}

#[test]
fn test_types_subcommands() {
    match parse(&["types", "resolve", "int4"]).command {
        Commands::Types(TypesCommand::Resolve {
            name
        }) => assert_eq!(name, "int4"),
        other => panic!("unexpected {:?}", other)
    }

    match parse(&["types", "list", "--category", "date-time", "--dialect", "sqlite"]).command {
        Commands::Types(TypesCommand::List {
            category,
            dialect
        }) => {
            assert_eq!(category, Some(DataTypeCategory::DateTime));
            assert_eq!(dialect, Some(Dialect::Sqlite));
        }
        other => panic!("unexpected {:?}", other)
    }

    match parse(&["types", "compatible", "JSONB", "--dialect", "mysql"]).command {
        Commands::Types(TypesCommand::Compatible {
            type_name,
            dialect
        }) => {
            assert_eq!(type_name, "JSONB");
            assert_eq!(dialect, Dialect::Mysql);
        }
        other => panic!("unexpected {:?}", other)
    }

    match parse(&["types", "infer", "1", "2", "3"]).command {
        Commands::Types(TypesCommand::Infer {
            values,
            dialect
        }) => {
            assert_eq!(values, vec!["1", "2", "3"]);
            assert_eq!(dialect, None);
        }
        other => panic!("unexpected {:?}", other)
    }

    match parse(&["types", "path", "INT", "TEXT"]).command {
        Commands::Types(TypesCommand::Path {
            source,
            target
        }) => {
            assert_eq!(source, "INT");
            assert_eq!(target, "TEXT");
        }
        other => panic!("unexpected {:?}", other)
    }
}

#[test]
fn test_compatible_requires_dialect() {
    assert!(Cli::try_parse_from(["sql-review", "types", "compatible", "JSONB"]).is_err());
}
