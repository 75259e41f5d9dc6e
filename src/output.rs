//! Rendering of analysis reports.
//!
//! Renderers only read an [`AnalysisReport`]; nothing here feeds back into
//! analysis. Output is deterministic for a given report so results can be
//! diffed between runs.

use colored::{ColoredString, Colorize};
use serde::Serialize;
use serde_json::{Value, json};

use crate::{
    report::AnalysisReport,
    rules::{Finding, Severity, builtin_rules}
};

const SARIF_SCHEMA: &str = "https://json.schemastore.org/sarif-2.1.0.json";

/// Output format for results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
    Sarif
}

/// Output options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format:  OutputFormat,
    pub colored: bool,
    pub verbose: bool
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format:  OutputFormat::Text,
            colored: true,
            verbose: false
        }
    }
}

/// Report of one input together with where it came from
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    /// File path, or `stdin`
    pub source: String,
    pub report: AnalysisReport
}

/// Format reports of one or more inputs.
///
/// JSON and YAML always emit a list so the shape does not depend on the
/// number of inputs.
pub fn format_reports(reports: &[SourceReport], opts: &OutputOptions) -> String {
    match opts.format {
        OutputFormat::Json => serde_json::to_string_pretty(reports).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(reports).unwrap_or_default(),
        OutputFormat::Sarif => format_sarif(reports),
        OutputFormat::Text => reports
            .iter()
            .map(|r| format_text(r, opts))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn paint(text: &str, colored: bool, style: fn(&str) -> ColoredString) -> String {
    if colored {
        style(text).to_string()
    } else {
        text.to_string()
    }
}

fn severity_label(severity: Severity, colored: bool) -> String {
    let label = format!("{:<8}", severity.to_string());
    let style: fn(&str) -> ColoredString = match severity {
        Severity::Critical => |s| s.red().bold(),
        Severity::High => |s| s.red(),
        Severity::Medium => |s| s.yellow(),
        Severity::Low => |s| s.blue()
    };
    paint(&label, colored, style)
}

fn format_text(source: &SourceReport, opts: &OutputOptions) -> String {
    let report = &source.report;
    let mut out = String::new();
    out.push_str(&paint(&format!("=== {} ===", source.source), opts.colored, |s| {
        s.bold()
    }));
    out.push('\n');

    let summary = &report.summary;
    out.push_str(&format!(
        "Tables: {} | Findings: {} (critical {}, high {}, medium {}, low {}) | Score: {}/100\n\n",
        report.tables.len(),
        summary.total,
        summary.critical,
        summary.high,
        summary.medium,
        summary.low,
        report.quality_score
    ));

    if opts.verbose {
        for table in &report.tables {
            let columns: Vec<String> = table
                .columns
                .iter()
                .map(|c| format!("{} {}", c.name, c.declared_type))
                .collect();
            out.push_str(&format!(
                "  table {} (line {}): {}\n",
                table.name,
                table.line,
                columns.join(", ")
            ));
        }
        if !report.tables.is_empty() {
            out.push('\n');
        }
    }

    if report.findings.is_empty() {
        out.push_str(&paint("No issues found\n", opts.colored, |s| s.green()));
    }
    for finding in &report.findings {
        format_finding(&mut out, finding, opts);
    }

    if !report.index_suggestions.is_empty() {
        out.push_str("\nIndex suggestions:\n");
        for index in &report.index_suggestions {
            out.push_str(&format!(
                "  - {}({}): {}\n",
                index.table,
                index.columns.join(", "),
                index.reason
            ));
        }
    }

    if !report.type_suggestions.is_empty() {
        out.push_str("\nType migrations:\n");
        for migration in &report.type_suggestions {
            let mut line = format!(
                "  - {}.{} {} -> {}",
                migration.table,
                migration.column,
                migration.declared_type,
                migration.candidates.join(" | ")
            );
            if opts.verbose
                && let Some(path) = &migration.path
            {
                line.push_str(&format!(" (path: {})", path.join(" -> ")));
            }
            out.push_str(&line);
            out.push('\n');
        }
    }

    out.push_str("\nRecommendations:\n");
    for (i, recommendation) in report.recommendations.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, recommendation));
    }
    out
}

fn format_finding(out: &mut String, finding: &Finding, opts: &OutputOptions) {
    let location = finding
        .line
        .map(|l| format!("line {}", l))
        .unwrap_or_else(|| "schema".to_string());
    out.push_str(&format!(
        "  {} {} [{}] {}: {}\n",
        severity_label(finding.severity, opts.colored),
        paint(finding.rule_id, opts.colored, |s| s.cyan()),
        finding.category,
        location,
        finding.message
    ));
    if !finding.fragment.is_empty() {
        out.push_str(&format!("      > {}\n", finding.fragment));
    }
    if let Some(suggestion) = &finding.suggestion {
        out.push_str(&format!(
            "      = {}\n",
            paint(suggestion, opts.colored, |s| s.green())
        ));
    }
    if opts.verbose {
        out.push_str(&format!("      confidence {:.2}\n", finding.confidence));
    }
}

fn sarif_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical | Severity::High => "error",
        Severity::Medium => "warning",
        Severity::Low => "note"
    }
}

fn sarif_result(source: &str, finding: &Finding) -> Value {
    let mut location = json!({
        "physicalLocation": {
            "artifactLocation": { "uri": source }
        }
    });
    if let Some(line) = finding.line {
        location["physicalLocation"]["region"] = json!({ "startLine": line });
    }
    let mut message = finding.message.clone();
    if let Some(suggestion) = &finding.suggestion {
        message.push_str(". ");
        message.push_str(suggestion);
    }
    json!({
        "ruleId": finding.rule_id,
        "level": sarif_level(finding.severity),
        "message": { "text": message },
        "locations": [location],
        "properties": {
            "category": finding.category.as_str(),
            "severity": finding.severity.as_str(),
            "confidence": finding.confidence
        }
    })
}

/// Render reports as a single SARIF 2.1.0 log with one run
pub fn format_sarif(reports: &[SourceReport]) -> String {
    let rules: Vec<Value> = builtin_rules()
        .iter()
        .map(|rule| {
            json!({
                "id": rule.id,
                "name": rule.name,
                "shortDescription": { "text": rule.name },
                "defaultConfiguration": { "level": sarif_level(rule.severity) },
                "properties": { "category": rule.category.as_str() }
            })
        })
        .collect();
    let results: Vec<Value> = reports
        .iter()
        .flat_map(|r| {
            r.report
                .findings
                .iter()
                .map(|f| sarif_result(&r.source, f))
        })
        .collect();
    let log = json!({
        "$schema": SARIF_SCHEMA,
        "version": "2.1.0",
        "runs": [{
            "tool": {
                "driver": {
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION"),
                    "informationUri": env!("CARGO_PKG_REPOSITORY"),
                    "rules": rules
                }
            },
            "results": results
        }]
    });
    serde_json::to_string_pretty(&log).unwrap_or_default()
}
