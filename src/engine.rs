//! Pipeline facade: extraction, analysis and aggregation in one call.
//!
//! ```
//! use sql_review::{config::AnalysisConfig, datatype::DataTypeRegistry, engine::Engine};
//!
//! let engine = Engine::new(DataTypeRegistry::global(), &AnalysisConfig::default());
//! let report = engine.analyze("CREATE TABLE t (id INT PRIMARY KEY);\nSELECT * FROM t;");
//!
//! assert_eq!(report.tables.len(), 1);
//! assert_eq!(report.findings[0].rule_id, "PERF001");
//! ```

use std::borrow::Cow;

use tracing::debug;

use crate::{
    config::{AnalysisConfig, RulesConfig},
    datatype::DataTypeRegistry,
    error::{AppResult, binary_input_error, input_too_large_error},
    report::{AnalysisReport, RecommendationAggregator},
    rules::RuleBasedAnalyzer,
    schema::SchemaExtractor
};

/// Reusable analysis pipeline.
///
/// Holds no per-run state, so one engine can analyze many documents, also
/// from several threads at once.
pub struct Engine<'r> {
    analyzer:   RuleBasedAnalyzer<'r>,
    aggregator: RecommendationAggregator<'r>
}

impl<'r> Engine<'r> {
    pub fn new(registry: &'r DataTypeRegistry, config: &AnalysisConfig) -> Self {
        Self::with_rules(registry, config, RulesConfig::default())
    }

    pub fn with_rules(
        registry: &'r DataTypeRegistry,
        config: &AnalysisConfig,
        rules: RulesConfig
    ) -> Self {
        Self {
            analyzer:   RuleBasedAnalyzer::with_config(registry, config, rules),
            aggregator: RecommendationAggregator::new(registry, config.target_dialect())
        }
    }

    /// Analyze SQL text. Never fails; malformed input yields findings.
    pub fn analyze(&self, sql: &str) -> AnalysisReport {
        let extraction = SchemaExtractor::extract_with_issues(sql);
        debug!(
            tables = extraction.tables.len(),
            skipped = extraction.skipped.len(),
            "schema extracted"
        );
        let (findings, _) = self.analyzer.analyze_with_schema(sql, &extraction);
        self.aggregator.aggregate(extraction.tables, findings)
    }
}

/// Turn raw input bytes into analyzable text.
///
/// Rejects input above `max_bytes` and input containing NUL bytes; invalid
/// UTF-8 sequences are replaced rather than rejected.
pub fn decode_input<'a>(source: &str, bytes: &'a [u8], max_bytes: usize) -> AppResult<Cow<'a, str>> {
    if bytes.len() > max_bytes {
        return Err(input_too_large_error(source, bytes.len(), max_bytes));
    }
    if let Some(offset) = bytes.iter().position(|b| *b == 0) {
        return Err(binary_input_error(source, offset));
    }
    Ok(String::from_utf8_lossy(bytes))
}
