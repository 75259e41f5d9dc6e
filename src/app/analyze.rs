//! The analyze command: read inputs, review them in parallel, render.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, info};

use super::{
    helpers::{apply_overrides, calculate_exit_code, create_output_options, read_input},
    types::{AnalyzeParams, CommandResult}
};
use crate::{
    config::Config,
    datatype::DataTypeRegistry,
    engine::Engine,
    error::AppResult,
    output::{SourceReport, format_reports}
};

fn progress_bar(len: usize) -> ProgressBar {
    if len < 2 {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Executes the analyze command.
///
/// Command-line flags are merged into `config`, then every input is read
/// and reviewed on the rayon pool with its own report. Reports keep the
/// order of `params.files`. The first unreadable or rejected input aborts
/// the run.
pub fn run_analyze(params: AnalyzeParams, mut config: Config) -> AppResult<CommandResult> {
    apply_overrides(&mut config, &params);
    debug!(
        dialect = %config.analysis.dialect,
        strict = config.analysis.strict,
        files = params.files.len(),
        "starting analysis"
    );
    let engine = Engine::with_rules(
        DataTypeRegistry::global(),
        &config.analysis,
        config.rules.clone()
    );
    let max_bytes = config.analysis.max_input_bytes;

    let pb = progress_bar(params.files.len());
    let reports = params
        .files
        .par_iter()
        .map(|path| {
            pb.set_message(path.clone());
            let sql = read_input(path, max_bytes)?;
            let report = engine.analyze(&sql);
            info!(
                source = %path,
                findings = report.findings.len(),
                score = %report.quality_score,
                "analyzed"
            );
            pb.inc(1);
            Ok(SourceReport {
                source: if path == "-" { "stdin".to_string() } else { path.clone() },
                report
            })
        })
        .collect::<AppResult<Vec<_>>>();
    pb.finish_and_clear();
    let reports = reports?;

    let opts = create_output_options(params.output_format, params.no_color, params.verbose);
    Ok(CommandResult::new(
        calculate_exit_code(&reports, params.min_score),
        format_reports(&reports, &opts)
    ))
}
