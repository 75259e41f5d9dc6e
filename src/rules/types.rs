//! Type definitions for the static analysis rule system.
//!
//! This module defines the core types used throughout the rule engine:
//! - [`Severity`] - Finding severity levels (Low, Medium, High, Critical)
//! - [`RuleCategory`] - Rule categories (Syntax, Performance, Security,
//!   Semantic)
//! - [`Finding`] - Individual rule findings with context
//! - [`QualityScore`] - Penalty-based score in `[0, 100]`

use std::fmt;

use serde::Serialize;

/// Severity level of a finding.
///
/// Ordered from lowest to highest severity for sorting purposes.
/// Exit codes are determined by the highest severity finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Improvement hint, does not affect exit code
    Low,
    /// Likely problem (exit code 1)
    Medium,
    /// Must be addressed (exit code 2)
    High,
    /// Data loss or injection risk (exit code 2)
    Critical
}

impl Severity {
    /// Most severe first
    pub const DESCENDING: [Severity; 4] = [Self::Critical, Self::High, Self::Medium, Self::Low];

    /// Points subtracted from the quality score per finding
    pub fn penalty(self) -> u32 {
        match self {
            Self::Critical => 25,
            Self::High => 15,
            Self::Medium => 8,
            Self::Low => 3
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical"
        }
    }

    /// Parse severity names used in configuration.
    ///
    /// The `info`/`warning`/`error` names of older configs are accepted.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" | "info" => Some(Self::Low),
            "medium" | "warning" | "warn" => Some(Self::Medium),
            "high" | "error" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
            Self::Critical => write!(f, "CRITICAL")
        }
    }
}

/// Category of a rule for grouping and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// Malformed or suspicious statement structure
    Syntax,
    /// Rules that detect potential performance issues
    Performance,
    /// Rules that identify potential security vulnerabilities
    Security,
    /// Constructs that run but likely mean something else
    Semantic
}

impl RuleCategory {
    /// Order in which categories are surfaced in recommendations
    pub const PRIORITY: [RuleCategory; 4] = [
        Self::Security,
        Self::Syntax,
        Self::Semantic,
        Self::Performance
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Syntax => "syntax",
            Self::Performance => "performance",
            Self::Security => "security",
            Self::Semantic => "semantic"
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "Syntax"),
            Self::Performance => write!(f, "Performance"),
            Self::Security => write!(f, "Security"),
            Self::Semantic => write!(f, "Semantic")
        }
    }
}

/// Metadata about a rule for identification and configuration.
#[derive(Debug, Clone, Copy)]
pub struct RuleInfo {
    /// Unique rule identifier (e.g., "PERF001")
    pub id:       &'static str,
    /// Human-readable rule name
    pub name:     &'static str,
    /// Default severity level
    pub severity: Severity,
    /// Rule category
    pub category: RuleCategory
}

/// Table column a finding is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FindingTarget {
    pub table:  String,
    pub column: String
}

/// A single issue found in the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    /// Unique rule identifier (e.g., "PERF001", "SEC001")
    pub rule_id:    &'static str,
    pub category:   RuleCategory,
    pub severity:   Severity,
    /// 1-based source line, when known
    pub line:       Option<usize>,
    pub message:    String,
    /// Trimmed, width-limited source snippet
    pub fragment:   String,
    pub suggestion: Option<String>,
    /// How sure the rule is, in `[0, 1]`
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target:     Option<FindingTarget>
}

impl Finding {
    /// Finding carrying the rule's default severity and full confidence
    pub fn new(info: &RuleInfo, message: impl Into<String>) -> Self {
        Self {
            rule_id:    info.id,
            category:   info.category,
            severity:   info.severity,
            line:       None,
            message:    message.into(),
            fragment:   String::new(),
            suggestion: None,
            confidence: 1.0,
            target:     None
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = fragment.into();
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn with_target(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.target = Some(FindingTarget {
            table:  table.into(),
            column: column.into()
        });
        self
    }
}

/// Quality score in `[0, 100]`.
///
/// Starts at 100 and loses [`Severity::penalty`] points per finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct QualityScore(u8);

impl QualityScore {
    pub const MAX: QualityScore = QualityScore(100);

    pub fn from_findings(findings: &[Finding]) -> Self {
        let penalty: u32 = findings.iter().map(|f| f.severity.penalty()).sum();
        Self(100u32.saturating_sub(penalty) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for QualityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INFO: RuleInfo = RuleInfo {
        id:       "TEST001",
        name:     "Test",
        severity: Severity::Medium,
        category: RuleCategory::Semantic
    };

    #[test]
    fn test_score_clamps_at_zero() {
        let findings: Vec<Finding> = (0..5)
            .map(|_| {
                let mut f = Finding::new(&INFO, "x");
                f.severity = Severity::Critical;
                f
            })
            .collect();
        assert_eq!(QualityScore::from_findings(&findings).value(), 0);
        assert_eq!(QualityScore::from_findings(&[]), QualityScore::MAX);
    }

    #[test]
    fn test_score_penalties() {
        let findings = vec![Finding::new(&INFO, "a"), Finding::new(&INFO, "b")];
        assert_eq!(QualityScore::from_findings(&findings).value(), 84);
    }

    #[test]
    fn test_severity_parse_accepts_legacy_names() {
        assert_eq!(Severity::parse("error"), Some(Severity::High));
        assert_eq!(Severity::parse("Critical"), Some(Severity::Critical));
        assert_eq!(Severity::parse("fatal"), None);
        assert!(Severity::Critical > Severity::High);
    }

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(Finding::new(&INFO, "x").with_confidence(1.5).confidence, 1.0);
    }
}
