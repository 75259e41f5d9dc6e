//! Application logic for the `sql-review` CLI.
//!
//! Kept apart from the binary entry point so commands can be driven and
//! tested without spawning a process.

mod analyze;
mod convert;
mod helpers;
mod inspect;
mod types;

pub use self::{
    analyze::run_analyze,
    convert::{convert_dialect, convert_format},
    helpers::{apply_overrides, calculate_exit_code, create_output_options, read_input},
    inspect::run_types,
    types::{AnalyzeParams, CommandResult}
};
