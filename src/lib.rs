//! # SQL Review Library
//!
//! Heuristic static review of SQL text: schema extraction, rule-based
//! findings with a quality score, and a cross-dialect data type registry.
//! Nothing is executed and malformed SQL never aborts an analysis.

pub mod app;
pub mod cli;
pub mod config;
pub mod datatype;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod output;
pub mod report;
pub mod rules;
pub mod schema;
