//! Static analysis rule engine for SQL text.
//!
//! The analyzer works without a SQL grammar. It runs three passes over the
//! input and merges their findings:
//!
//! ```text
//! ┌─────────────┐     ┌───────────────────┐     ┌─────────────┐
//! │  SQL text   │────▶│ RuleBasedAnalyzer │────▶│  Findings   │
//! └─────────────┘     └───────────────────┘     │  + score    │
//!                        │       │       │      └─────────────┘
//!                     lines  statements  schema
//! ```
//!
//! - **Line rules** are a declarative table of regex rules checked against
//!   every non-comment line. Every matching rule reports; there is no
//!   first-match-wins.
//! - **Statement checks** look for unbalanced parentheses, unclosed quotes
//!   and stray commas, and optionally hand each statement to `sqlparser`.
//! - **Schema checks** run over tables recovered by the
//!   [`SchemaExtractor`](crate::schema::SchemaExtractor).
//!
//! # Rule Categories
//!
//! - **Security** (`SEC001`-`SEC008`) - Dangerous operations and injection
//! - **Performance** (`PERF001`-`PERF008`) - Query optimization issues
//! - **Semantic** (`SEM001`-`SEM003`) - Constructs that likely mean
//!   something else
//! - **Syntax** (`SYN001`, `SYN101`-`SYN105`) - Malformed statements
//! - **Schema** (`SCH001`-`SCH011`) - Table design, types and indexes
//!
//! # Configuration
//!
//! Rules can be disabled or have their severity modified via [`RulesConfig`]:
//!
//! ```toml
//! [rules]
//! disabled = ["PERF006"]
//!
//! [rules.severity]
//! PERF001 = "low"
//! ```
//!
//! # Example
//!
//! ```
//! use sql_review::{datatype::DataTypeRegistry, rules::{RuleBasedAnalyzer, Severity}};
//!
//! let analyzer = RuleBasedAnalyzer::new(DataTypeRegistry::global());
//! let (findings, score) = analyzer.analyze("DELETE FROM users;");
//!
//! assert_eq!(findings.len(), 1);
//! assert_eq!(findings[0].severity, Severity::Critical);
//! assert_eq!(score.value(), 75);
//! ```

mod performance;
pub mod schema_aware;
mod security;
mod semantic;
mod syntax;
mod types;

use std::{collections::HashMap, sync::LazyLock};

use regex::{Captures, Regex};
use tracing::{debug, warn};
pub use types::{Finding, FindingTarget, QualityScore, RuleCategory, RuleInfo, Severity};

use crate::{
    config::{AnalysisConfig, RulesConfig},
    datatype::DataTypeRegistry,
    dialect::SqlDialect,
    schema::{
        Extraction,
        splitter::{mask_quoted, strip_comments_with}
    }
};

static LINE_RULES: LazyLock<Vec<LineRule>> = LazyLock::new(|| {
    [
        security::rules(),
        performance::rules(),
        semantic::rules(),
        syntax::rules()
    ]
    .into_iter()
    .flatten()
    .collect()
});

/// Which rendition of a line a rule pattern is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTarget {
    /// Line with comments removed, literals intact
    Raw,
    /// Line with single-quoted literal contents blanked
    Code
}

/// One input line as seen by line rules.
#[derive(Debug, Clone, Copy)]
pub struct SourceLine<'a> {
    /// 1-based line number
    pub number:   usize,
    /// Comments blanked, literals intact
    pub raw:      &'a str,
    /// `raw` with single-quoted literal contents blanked
    pub code:     &'a str,
    /// Untouched input line
    pub original: &'a str
}

/// Trait for implementing line-based analysis rules.
///
/// Rules are stateless and examine one line at a time. They must be
/// `Send + Sync` so one analyzer can serve several threads.
///
/// # Example
///
/// ```
/// use sql_review::rules::{Finding, Rule, RuleCategory, RuleInfo, Severity, SourceLine};
///
/// struct NoSleep;
///
/// impl Rule for NoSleep {
///     fn info(&self) -> RuleInfo {
///         RuleInfo {
///             id:       "CUSTOM001",
///             name:     "SLEEP call",
///             severity: Severity::Medium,
///             category: RuleCategory::Performance
///         }
///     }
///
///     fn check(&self, line: &SourceLine<'_>) -> Option<Finding> {
///         line.code
///             .to_ascii_uppercase()
///             .contains("SLEEP(")
///             .then(|| Finding::new(&self.info(), "SLEEP stalls the connection").at_line(line.number))
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns metadata about this rule.
    fn info(&self) -> RuleInfo;

    /// Examines a line and returns a finding when the rule matches.
    fn check(&self, line: &SourceLine<'_>) -> Option<Finding>;
}

/// Declarative regex rule.
///
/// `pattern` must match, `confirm` (if any) must accept at least one match
/// and `unless` (matched against the code rendition) must not match.
pub(crate) struct LineRule {
    info:       RuleInfo,
    pattern:    Regex,
    unless:     Option<Regex>,
    confirm:    Option<fn(&Captures<'_>) -> bool>,
    target:     MatchTarget,
    message:    &'static str,
    suggestion: Option<&'static str>,
    confidence: f32
}

impl LineRule {
    fn new(info: RuleInfo, pattern: &str, message: &'static str) -> Self {
        Self {
            info,
            pattern: Regex::new(pattern).expect("valid regex"),
            unless: None,
            confirm: None,
            target: MatchTarget::Code,
            message,
            suggestion: None,
            confidence: 1.0
        }
    }

    fn unless(mut self, pattern: &str) -> Self {
        self.unless = Some(Regex::new(pattern).expect("valid regex"));
        self
    }

    fn on(mut self, target: MatchTarget) -> Self {
        self.target = target;
        self
    }

    fn confirm(mut self, check: fn(&Captures<'_>) -> bool) -> Self {
        self.confirm = Some(check);
        self
    }

    fn suggest(mut self, suggestion: &'static str) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    fn confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }
}

impl Rule for &'static LineRule {
    fn info(&self) -> RuleInfo {
        self.info
    }

    fn check(&self, line: &SourceLine<'_>) -> Option<Finding> {
        let haystack = match self.target {
            MatchTarget::Raw => line.raw,
            MatchTarget::Code => line.code
        };
        let matched = self
            .pattern
            .captures_iter(haystack)
            .any(|caps| self.confirm.is_none_or(|confirm| confirm(&caps)));
        if !matched || self.unless.as_ref().is_some_and(|re| re.is_match(line.code)) {
            return None;
        }
        let mut finding = Finding::new(&self.info, self.message)
            .at_line(line.number)
            .with_fragment(line.original.trim())
            .with_confidence(self.confidence);
        if let Some(suggestion) = self.suggestion {
            finding = finding.with_suggestion(suggestion);
        }
        Some(finding)
    }
}

/// Metadata of every built-in rule, line rules first.
pub fn builtin_rules() -> Vec<RuleInfo> {
    LINE_RULES
        .iter()
        .map(|r| r.info)
        .chain(syntax::STATEMENT_RULES)
        .chain(schema_aware::RULES)
        .collect()
}

/// Rule-based analyzer producing findings and a quality score.
///
/// Holds the enabled line rules, the severity overrides and a reference to
/// the shared type registry. Analysis itself never fails.
pub struct RuleBasedAnalyzer<'r> {
    registry:       &'r DataTypeRegistry,
    rules:          Vec<Box<dyn Rule>>,
    config:         RulesConfig,
    severity_cache: HashMap<String, Severity>,
    dialect:        SqlDialect,
    strict:         bool,
    snippet_width:  usize
}

impl<'r> RuleBasedAnalyzer<'r> {
    /// Create an analyzer with all default rules
    pub fn new(registry: &'r DataTypeRegistry) -> Self {
        Self::with_config(registry, &AnalysisConfig::default(), RulesConfig::default())
    }

    /// Create an analyzer with configuration
    pub fn with_config(
        registry: &'r DataTypeRegistry,
        analysis: &AnalysisConfig,
        config: RulesConfig
    ) -> Self {
        let rules: Vec<Box<dyn Rule>> = LINE_RULES
            .iter()
            .filter(|r| !config.is_disabled(r.info.id))
            .map(|r| Box::new(r) as Box<dyn Rule>)
            .collect();
        let mut severity_cache = HashMap::new();
        for (rule_id, value) in &config.severity {
            match Severity::parse(value) {
                Some(severity) => {
                    severity_cache.insert(rule_id.to_ascii_uppercase(), severity);
                }
                None => warn!(rule = %rule_id, value = %value, "ignoring unknown severity override")
            }
        }
        Self {
            registry,
            rules,
            config,
            severity_cache,
            dialect: analysis.dialect,
            strict: analysis.strict,
            snippet_width: analysis.snippet_width
        }
    }

    /// Add a custom line rule unless it is disabled
    pub fn with_rule(mut self, rule: Box<dyn Rule>) -> Self {
        if !self.config.is_disabled(rule.info().id) {
            self.rules.push(rule);
        }
        self
    }

    /// Number of enabled line rules
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Run line rules and statement checks.
    pub fn analyze(&self, sql: &str) -> (Vec<Finding>, QualityScore) {
        let stripped = self.strip_comments(sql);
        let findings = self.scan(sql, &stripped);
        self.finish(findings)
    }

    /// Run line rules, statement checks and schema checks.
    pub fn analyze_with_schema(
        &self,
        sql: &str,
        extraction: &Extraction
    ) -> (Vec<Finding>, QualityScore) {
        let stripped = self.strip_comments(sql);
        let mut findings = self.scan(sql, &stripped);
        let dialect = (self.dialect != SqlDialect::Generic).then(|| self.dialect.as_str());
        findings.extend(schema_aware::check(&schema_aware::SchemaInput {
            text: &stripped,
            original: sql,
            extraction,
            registry: self.registry,
            dialect
        }));
        self.finish(findings)
    }

    /// MySQL reads `#` as a comment anywhere on a line.
    fn strip_comments(&self, sql: &str) -> String {
        strip_comments_with(sql, self.dialect == SqlDialect::MySQL)
    }

    fn scan(&self, sql: &str, stripped: &str) -> Vec<Finding> {
        let mut findings = Vec::new();
        for (idx, (raw, original)) in stripped.lines().zip(sql.lines()).enumerate() {
            if raw.trim().is_empty() {
                continue;
            }
            let code = mask_quoted(raw);
            let line = SourceLine {
                number: idx + 1,
                raw,
                code: &code,
                original
            };
            findings.extend(self.rules.iter().filter_map(|rule| rule.check(&line)));
        }
        let strict = self.strict.then_some(self.dialect);
        findings.extend(syntax::check_statements(stripped, sql, strict));
        findings
    }

    fn finish(&self, findings: Vec<Finding>) -> (Vec<Finding>, QualityScore) {
        let mut findings: Vec<Finding> = findings
            .into_iter()
            .filter(|f| !self.config.is_disabled(f.rule_id))
            .map(|mut f| {
                if let Some(&severity) = self.severity_cache.get(&f.rule_id.to_ascii_uppercase()) {
                    f.severity = severity;
                }
                f.fragment = snippet(&f.fragment, self.snippet_width);
                f
            })
            .collect();
        sort_findings(&mut findings);
        let score = QualityScore::from_findings(&findings);
        debug!(findings = findings.len(), score = score.value(), "analysis finished");
        (findings, score)
    }
}

/// Order findings by line, then severity (most severe first), then rule id.
///
/// Findings without a line come last.
pub fn sort_findings(findings: &mut [Finding]) {
    findings.sort_by(|a, b| {
        a.line
            .unwrap_or(usize::MAX)
            .cmp(&b.line.unwrap_or(usize::MAX))
            .then_with(|| b.severity.cmp(&a.severity))
            .then_with(|| a.rule_id.cmp(b.rule_id))
    });
}

/// Trim `text` and cut it to `width` characters, marking the cut with `...`.
pub fn snippet(text: &str, width: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

/// Text of 1-based `line`, empty when out of range.
pub(crate) fn line_text(text: &str, line: usize) -> &str {
    text.lines()
        .nth(line.saturating_sub(1))
        .unwrap_or_default()
}
