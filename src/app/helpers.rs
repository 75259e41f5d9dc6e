//! Helper functions for CLI operations.

use std::{
    fs,
    io::{self, Read}
};

use super::{
    convert::{convert_dialect, convert_format},
    types::AnalyzeParams
};
use crate::{
    cli::Format,
    config::Config,
    engine::decode_input,
    error::{AppResult, file_read_error, input_too_large_error},
    output::{OutputOptions, SourceReport},
    rules::Severity
};

/// Calculates the process exit code of an analyze run.
///
/// - `2` - a critical or high finding, or a score below `min_score`
/// - `1` - at least one medium finding
/// - `0` - only low findings or none
pub fn calculate_exit_code(reports: &[SourceReport], min_score: Option<u8>) -> i32 {
    let below_minimum = min_score.is_some_and(|min| {
        reports
            .iter()
            .any(|r| r.report.quality_score.value() < min)
    });
    let worst = reports.iter().filter_map(|r| r.report.max_severity()).max();
    match worst {
        _ if below_minimum => 2,
        Some(Severity::Critical | Severity::High) => 2,
        Some(Severity::Medium) => 1,
        _ => 0
    }
}

/// Reads one input from a file, or from stdin when the path is "-".
///
/// Files larger than `max_bytes` are rejected from their metadata without
/// being read. The bytes pass through [`decode_input`], so oversized and
/// binary input is rejected here.
pub fn read_input(path: &str, max_bytes: usize) -> AppResult<String> {
    let (source, bytes) = if path == "-" {
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .map_err(|e| file_read_error("stdin", e))?;
        ("stdin", buffer)
    } else {
        let size = fs::metadata(path)
            .map_err(|e| file_read_error(path, e))?
            .len();
        if size > max_bytes as u64 {
            let size = usize::try_from(size).unwrap_or(usize::MAX);
            return Err(input_too_large_error(path, size, max_bytes));
        }
        (path, fs::read(path).map_err(|e| file_read_error(path, e))?)
    };
    Ok(decode_input(source, &bytes, max_bytes)?.into_owned())
}

/// Create output options from parameters
pub fn create_output_options(format: Format, no_color: bool, verbose: bool) -> OutputOptions {
    OutputOptions {
        format: convert_format(format),
        colored: !no_color,
        verbose
    }
}

/// Apply command-line flags on top of the loaded configuration
pub fn apply_overrides(config: &mut Config, params: &AnalyzeParams) {
    if let Some(dialect) = params.dialect {
        config.analysis.dialect = convert_dialect(dialect);
    }
    if params.strict {
        config.analysis.strict = true;
    }
}
