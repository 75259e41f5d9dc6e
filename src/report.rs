//! Merging of schema and findings into the final report.
//!
//! The [`RecommendationAggregator`] is the last step of a run. It orders
//! findings, recomputes the score, derives index and type-migration
//! suggestions and ranks the human-readable recommendations. Renderers only
//! read the resulting [`AnalysisReport`].

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::{
    datatype::DataTypeRegistry,
    dialect::SqlDialect,
    rules::{Finding, QualityScore, RuleCategory, Severity, schema_aware, sort_findings},
    schema::TableDefinition
};

/// Reminders appended to every report.
pub const GENERIC_RECOMMENDATIONS: [&str; 3] = [
    "Paginate large result sets instead of fetching them at once",
    "Monitor slow query logs after deploying these statements",
    "Have schema and query changes peer reviewed before they reach production"
];

/// Index worth creating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexSuggestion {
    pub table:   String,
    pub columns: Vec<String>,
    pub reason:  String
}

/// Column whose type does not exist in the target dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeMigration {
    pub table:         String,
    pub column:        String,
    pub declared_type: String,
    pub dialect:       String,
    /// Compatible types in the dialect, best first
    pub candidates:    Vec<String>,
    /// Conversion steps to the first candidate
    pub path:          Option<Vec<String>>
}

/// Finding counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total:       usize,
    pub critical:    usize,
    pub high:        usize,
    pub medium:      usize,
    pub low:         usize,
    pub syntax:      usize,
    pub performance: usize,
    pub security:    usize,
    pub semantic:    usize
}

impl Summary {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut summary = Self {
            total: findings.len(),
            ..Self::default()
        };
        for finding in findings {
            match finding.severity {
                Severity::Critical => summary.critical += 1,
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1
            }
            match finding.category {
                RuleCategory::Syntax => summary.syntax += 1,
                RuleCategory::Performance => summary.performance += 1,
                RuleCategory::Security => summary.security += 1,
                RuleCategory::Semantic => summary.semantic += 1
            }
        }
        summary
    }

    pub fn category(&self, category: RuleCategory) -> usize {
        match category {
            RuleCategory::Syntax => self.syntax,
            RuleCategory::Performance => self.performance,
            RuleCategory::Security => self.security,
            RuleCategory::Semantic => self.semantic
        }
    }
}

/// Complete result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub tables:            Vec<TableDefinition>,
    /// Ordered by line, severity (descending), rule id
    pub findings:          Vec<Finding>,
    pub quality_score:     QualityScore,
    /// Ranked, most important first
    pub recommendations:   Vec<String>,
    pub index_suggestions: Vec<IndexSuggestion>,
    pub type_suggestions:  Vec<TypeMigration>,
    pub summary:           Summary
}

impl AnalysisReport {
    /// Highest severity among the findings
    pub fn max_severity(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).max()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }
}

/// Builds [`AnalysisReport`]s.
pub struct RecommendationAggregator<'r> {
    registry: &'r DataTypeRegistry,
    dialect:  Option<&'static str>
}

impl<'r> RecommendationAggregator<'r> {
    /// `dialect` enables type-migration suggestions; unknown or generic
    /// dialects disable them.
    pub fn new(registry: &'r DataTypeRegistry, dialect: Option<&str>) -> Self {
        let dialect = dialect
            .and_then(SqlDialect::parse_lenient)
            .filter(|d| *d != SqlDialect::Generic)
            .map(SqlDialect::as_str);
        Self {
            registry,
            dialect
        }
    }

    pub fn aggregate(&self, tables: Vec<TableDefinition>, mut findings: Vec<Finding>) -> AnalysisReport {
        sort_findings(&mut findings);
        let quality_score = QualityScore::from_findings(&findings);
        let summary = Summary::from_findings(&findings);
        let index_suggestions = index_suggestions(&tables, &findings);
        let type_suggestions = self.type_migrations(&tables);
        let recommendations = recommendations(&summary, index_suggestions.len());
        debug!(
            findings = summary.total,
            score = quality_score.value(),
            indexes = index_suggestions.len(),
            migrations = type_suggestions.len(),
            "report aggregated"
        );
        AnalysisReport {
            tables,
            findings,
            quality_score,
            recommendations,
            index_suggestions,
            type_suggestions,
            summary
        }
    }

    fn type_migrations(&self, tables: &[TableDefinition]) -> Vec<TypeMigration> {
        let Some(dialect) = self.dialect else {
            return Vec::new();
        };
        let mut migrations = Vec::new();
        for table in tables {
            for column in &table.columns {
                let Some(descriptor) = self.registry.resolve(&column.declared_type) else {
                    continue;
                };
                if descriptor.supports(dialect) {
                    continue;
                }
                let candidates: Vec<String> = self
                    .registry
                    .find_compatible(&descriptor.canonical_name, dialect)
                    .iter()
                    .map(|d| d.canonical_name.to_string())
                    .collect();
                let path = candidates.first().and_then(|target| {
                    self.registry
                        .conversion_path(&descriptor.canonical_name, target)
                        .map(|steps| steps.into_iter().map(str::to_string).collect())
                });
                migrations.push(TypeMigration {
                    table: table.name.clone(),
                    column: column.name.clone(),
                    declared_type: column.declared_type.clone(),
                    dialect: dialect.to_string(),
                    candidates,
                    path
                });
            }
        }
        migrations
    }
}

fn index_suggestions(tables: &[TableDefinition], findings: &[Finding]) -> Vec<IndexSuggestion> {
    let mut predicate_hits: Vec<((String, String), usize)> = Vec::new();
    for target in findings
        .iter()
        .filter(|f| f.rule_id == schema_aware::MISSING_INDEX.id)
        .filter_map(|f| f.target.as_ref())
    {
        let key = (target.table.clone(), target.column.clone());
        match predicate_hits.iter_mut().find(|(k, _)| {
            k.0.eq_ignore_ascii_case(&key.0) && k.1.eq_ignore_ascii_case(&key.1)
        }) {
            Some((_, count)) => *count += 1,
            None => predicate_hits.push((key, 1))
        }
    }

    let by_name: HashMap<String, &TableDefinition> =
        tables.iter().map(|t| (t.name.to_lowercase(), t)).collect();
    let mut suggestions: Vec<IndexSuggestion> = predicate_hits
        .into_iter()
        .filter(|((table, column), _)| {
            !by_name
                .get(&table.to_lowercase())
                .is_some_and(|t| t.is_primary_key_column(column))
        })
        .map(|((table, column), count)| IndexSuggestion {
            table,
            columns: vec![column],
            reason: format!("Used in {} predicate(s) without a covering index", count)
        })
        .collect();

    for table in tables {
        for fk in &table.foreign_keys {
            if table.column(&fk.column).is_none() || table.has_leading_index(&fk.column) {
                continue;
            }
            let exists = suggestions.iter().any(|s| {
                s.table.eq_ignore_ascii_case(&table.name)
                    && s.columns.len() == 1
                    && s.columns[0].eq_ignore_ascii_case(&fk.column)
            });
            if exists {
                continue;
            }
            let target = if fk.referenced_column.is_empty() {
                fk.referenced_table.clone()
            } else {
                format!("{}({})", fk.referenced_table, fk.referenced_column)
            };
            suggestions.push(IndexSuggestion {
                table:   table.name.clone(),
                columns: vec![fk.column.clone()],
                reason:  format!("Foreign key to {} has no supporting index", target)
            });
        }
    }
    suggestions
}

fn recommendations(summary: &Summary, index_count: usize) -> Vec<String> {
    let mut out = Vec::new();
    if summary.critical > 0 {
        out.push(format!(
            "Fix the {} critical issue(s) first: they can destroy data or expose it",
            summary.critical
        ));
    }
    for category in RuleCategory::PRIORITY {
        let count = summary.category(category);
        if count == 0 {
            continue;
        }
        out.push(match category {
            RuleCategory::Security => format!(
                "Review {} security finding(s): guard destructive statements and parameterize user input",
                count
            ),
            RuleCategory::Syntax => {
                format!("Fix {} syntax issue(s) before running the script", count)
            }
            RuleCategory::Semantic => format!(
                "Resolve {} semantic issue(s) such as NULL comparisons and inconsistent keys",
                count
            ),
            RuleCategory::Performance if index_count > 0 => format!(
                "Address {} performance issue(s), starting with the {} suggested index(es)",
                count, index_count
            ),
            RuleCategory::Performance => format!(
                "Address {} performance issue(s) to keep queries index-friendly",
                count
            )
        });
    }
    out.extend(GENERIC_RECOMMENDATIONS.iter().map(|s| s.to_string()));
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        rules::RuleInfo,
        schema::SchemaExtractor
    };

    fn finding(id: &'static str, category: RuleCategory, severity: Severity, line: usize) -> Finding {
        Finding::new(
            &RuleInfo {
                id,
                name: id,
                severity,
                category
            },
            id
        )
        .at_line(line)
    }

    #[test]
    fn test_empty_report_has_generic_recommendations() {
        let report = RecommendationAggregator::new(DataTypeRegistry::global(), None)
            .aggregate(Vec::new(), Vec::new());
        assert_eq!(report.quality_score, QualityScore::MAX);
        assert_eq!(report.recommendations, GENERIC_RECOMMENDATIONS.map(String::from).to_vec());
        assert_eq!(report.max_severity(), None);
    }

    #[test]
    fn test_recommendation_ranking() {
        let findings = vec![
            finding("PERF001", RuleCategory::Performance, Severity::Medium, 1),
            finding("SEM001", RuleCategory::Semantic, Severity::High, 2),
            finding("SEC001", RuleCategory::Security, Severity::Critical, 3),
        ];
        let report = RecommendationAggregator::new(DataTypeRegistry::global(), None)
            .aggregate(Vec::new(), findings);
        let recs = &report.recommendations;
        assert!(recs[0].contains("critical"));
        assert!(recs[1].contains("security"));
        assert!(recs[2].contains("semantic"));
        assert!(recs[3].contains("performance"));
        assert_eq!(recs.len(), 4 + GENERIC_RECOMMENDATIONS.len());
        assert_eq!(report.quality_score.value(), 100 - 8 - 15 - 25);
        assert_eq!(report.summary.total, 3);
        assert_eq!(report.max_severity(), Some(Severity::Critical));
    }

    #[test]
    fn test_findings_sorted() {
        let findings = vec![
            finding("B", RuleCategory::Syntax, Severity::Low, 2),
            finding("A", RuleCategory::Syntax, Severity::Low, 2),
            finding("C", RuleCategory::Syntax, Severity::High, 2),
            finding("D", RuleCategory::Syntax, Severity::Low, 1),
        ];
        let report = RecommendationAggregator::new(DataTypeRegistry::global(), None)
            .aggregate(Vec::new(), findings);
        let ids: Vec<&str> = report.findings.iter().map(|f| f.rule_id).collect();
        assert_eq!(ids, vec!["D", "C", "A", "B"]);
    }

    #[test]
    fn test_index_suggestions_skip_primary_keys() {
        let tables = SchemaExtractor::extract(
            "CREATE TABLE users (id INT PRIMARY KEY, email TEXT);\n\
             CREATE TABLE orders (id INT PRIMARY KEY, user_id INT REFERENCES users(id));"
        );
        let findings = vec![
            finding("SCH011", RuleCategory::Performance, Severity::Medium, 3).with_target("users", "email"),
            finding("SCH011", RuleCategory::Performance, Severity::Medium, 4).with_target("users", "email"),
            finding("SCH011", RuleCategory::Performance, Severity::Medium, 5).with_target("users", "id"),
        ];
        let report = RecommendationAggregator::new(DataTypeRegistry::global(), None)
            .aggregate(tables, findings);
        assert_eq!(report.index_suggestions.len(), 2);
        assert_eq!(report.index_suggestions[0].columns, vec!["email"]);
        assert!(report.index_suggestions[0].reason.contains("2 predicate"));
        assert_eq!(report.index_suggestions[1].table, "orders");
        assert_eq!(report.index_suggestions[1].columns, vec!["user_id"]);
    }

    #[test]
    fn test_type_migrations_for_target_dialect() {
        let tables = SchemaExtractor::extract("CREATE TABLE t (id UUID PRIMARY KEY, n INT);");
        let report = RecommendationAggregator::new(DataTypeRegistry::global(), Some("mssql"))
            .aggregate(tables.clone(), Vec::new());
        assert_eq!(report.type_suggestions.len(), 1);
        let migration = &report.type_suggestions[0];
        assert_eq!(migration.column, "id");
        assert_eq!(migration.candidates[0], "UNIQUEIDENTIFIER");
        assert_eq!(
            migration.path,
            Some(vec!["UUID".to_string(), "UNIQUEIDENTIFIER".to_string()])
        );

        let report = RecommendationAggregator::new(DataTypeRegistry::global(), None).aggregate(tables, Vec::new());
        assert!(report.type_suggestions.is_empty());
    }
}
