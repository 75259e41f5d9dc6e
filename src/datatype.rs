//! Cross-dialect data type registry.
//!
//! The registry is built once from the built-in catalog and is read-only
//! afterwards, so a single instance can be shared by every analysis run.
//!
//! ```
//! use sql_review::datatype::DataTypeRegistry;
//!
//! let registry = DataTypeRegistry::global();
//! let int = registry.resolve("int4").unwrap();
//! assert_eq!(int.canonical_name, "INTEGER");
//! assert_eq!(registry.conversion_path("UUID", "UNIQUEIDENTIFIER"), Some(vec!["UUID", "UNIQUEIDENTIFIER"]));
//! ```

mod catalog;
pub mod sample;
pub mod types;

use std::{collections::HashMap, sync::LazyLock};

use compact_str::CompactString;
use indexmap::IndexMap;
use tracing::{trace, warn};

pub use self::{
    sample::SampleFormat,
    types::{DataTypeCategory, DataTypeDescriptor, TypeSuggestion}
};
use crate::dialect::SqlDialect;

/// Maximum number of suggestions returned by sample inference
pub const MAX_SUGGESTIONS: usize = 10;

static REGISTRY: LazyLock<DataTypeRegistry> = LazyLock::new(DataTypeRegistry::new);

/// Lookup table of data type descriptors keyed by canonical name and alias.
#[derive(Debug, Clone)]
pub struct DataTypeRegistry {
    types:   IndexMap<CompactString, DataTypeDescriptor>,
    /// Upper-cased alias to index in `types`; first registration wins
    aliases: HashMap<CompactString, usize>
}

impl Default for DataTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DataTypeRegistry {
    /// Registry holding every built-in type
    pub fn new() -> Self {
        Self::from_descriptors(catalog::BUILTIN.iter().map(catalog::TypeSpec::to_descriptor))
    }

    /// Registry over a custom set of descriptors
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = DataTypeDescriptor>) -> Self {
        let mut registry = Self {
            types:   IndexMap::new(),
            aliases: HashMap::new()
        };
        for descriptor in descriptors {
            registry.register(descriptor);
        }
        registry
    }

    /// Process-wide shared registry
    pub fn global() -> &'static Self {
        &REGISTRY
    }

    fn register(&mut self, descriptor: DataTypeDescriptor) {
        let key = CompactString::from(descriptor.canonical_name.to_uppercase());
        let aliases: Vec<CompactString> = descriptor
            .aliases
            .iter()
            .map(|a| CompactString::from(a.to_uppercase()))
            .collect();
        let (index, replaced) = self.types.insert_full(key, descriptor);
        if replaced.is_some() {
            warn!(index, "data type registered twice, keeping the later descriptor");
        }
        for alias in aliases {
            if self.types.contains_key(&alias) {
                continue;
            }
            self.aliases.entry(alias).or_insert(index);
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Descriptors in registration order
    pub fn iter(&self) -> impl Iterator<Item = &DataTypeDescriptor> {
        self.types.values()
    }

    /// Look a type up by canonical name or alias, case-insensitively.
    ///
    /// Type arguments (`VARCHAR(255)`) are ignored and a trailing `[]`
    /// resolves to `ARRAY`. Unknown names yield `None`.
    pub fn resolve(&self, name: &str) -> Option<&DataTypeDescriptor> {
        let trimmed = name.trim();
        if trimmed.ends_with("[]") {
            return self.types.get("ARRAY");
        }
        let base = match trimmed.find('(') {
            Some(open) => &trimmed[..open],
            None => trimmed
        };
        let key = base
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();
        if key.is_empty() {
            return None;
        }
        self.types.get(key.as_str()).or_else(|| {
            self.aliases
                .get(key.as_str())
                .and_then(|&i| self.types.get_index(i))
                .map(|(_, d)| d)
        })
    }

    pub fn types_in_category(&self, category: DataTypeCategory) -> Vec<&DataTypeDescriptor> {
        self.iter().filter(|d| d.category == category).collect()
    }

    /// Types available in `dialect`; empty for unknown dialects
    pub fn types_in_dialect(&self, dialect: &str) -> Vec<&DataTypeDescriptor> {
        let Some(dialect) = SqlDialect::normalize(dialect) else {
            return Vec::new();
        };
        self.iter()
            .filter(|d| d.supported_dialects.contains(dialect))
            .collect()
    }

    /// Types of `dialect` that can hold values of `source`.
    ///
    /// The source itself comes first when the dialect has it, then the
    /// explicit conversion target, then the remaining types of the same
    /// category in registry order.
    pub fn find_compatible(&self, source: &str, dialect: &str) -> Vec<&DataTypeDescriptor> {
        let Some(source) = self.resolve(source) else {
            return Vec::new();
        };
        let Some(dialect) = SqlDialect::normalize(dialect) else {
            return Vec::new();
        };
        fn push<'r>(out: &mut Vec<&'r DataTypeDescriptor>, d: &'r DataTypeDescriptor) {
            if !out.iter().any(|o| o.canonical_name == d.canonical_name) {
                out.push(d);
            }
        }
        let mut out = Vec::new();
        if source.supported_dialects.contains(dialect) {
            push(&mut out, source);
        }
        if let Some(target) = source
            .conversion_for(dialect)
            .and_then(|t| self.resolve(t))
        {
            push(&mut out, target);
        }
        for candidate in self.iter() {
            if candidate.category == source.category && candidate.supported_dialects.contains(dialect) {
                push(&mut out, candidate);
            }
        }
        out
    }

    /// Rank types by how well they fit the sample values.
    ///
    /// Blank and `NULL` samples are ignored. Confidence is the share of
    /// samples the type accepts, weighted by its specificity. At most
    /// [`MAX_SUGGESTIONS`] results, best first.
    pub fn suggest_from_samples<S: AsRef<str>>(
        &self,
        values: &[S],
        dialect: Option<&str>
    ) -> Vec<TypeSuggestion<'_>> {
        let samples: Vec<&str> = values
            .iter()
            .map(|v| v.as_ref().trim())
            .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("null"))
            .collect();
        if samples.is_empty() {
            return Vec::new();
        }
        let dialect = match dialect {
            Some(name) => match SqlDialect::normalize(name) {
                Some(d) => Some(d),
                None => return Vec::new()
            },
            None => None
        };
        let total = samples.len() as f32;
        let mut suggestions: Vec<TypeSuggestion<'_>> = self
            .iter()
            .filter(|d| dialect.is_none_or(|dl| d.supported_dialects.contains(dl)))
            .filter_map(|descriptor| {
                let format = descriptor.sample_format?;
                let matched = samples.iter().filter(|s| format.accepts(s)).count();
                let confidence = matched as f32 / total * descriptor.specificity;
                (confidence > 0.0).then_some(TypeSuggestion {
                    descriptor,
                    confidence
                })
            })
            .collect();
        suggestions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        suggestions.truncate(MAX_SUGGESTIONS);
        trace!(samples = samples.len(), found = suggestions.len(), "type inference");
        suggestions
    }

    /// Conversion steps from `source` to `target`, canonical names only.
    ///
    /// Tries a direct rule or same-category hop, then one intermediate type
    /// of the source category that has a rule to the target.
    pub fn conversion_path(&self, source: &str, target: &str) -> Option<Vec<&str>> {
        let from = self.resolve(source)?;
        let to = self.resolve(target)?;
        let from_name = from.canonical_name.as_str();
        let to_name = to.canonical_name.as_str();
        if from_name == to_name {
            return Some(vec![from_name]);
        }
        if from.converts_to(to_name) || from.category == to.category {
            return Some(vec![from_name, to_name]);
        }
        self.iter()
            .find(|mid| {
                mid.category == from.category
                    && mid.canonical_name != from.canonical_name
                    && mid.converts_to(to_name)
            })
            .map(|mid| vec![from_name, mid.canonical_name.as_str(), to_name])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_is_case_insensitive() {
        let registry = DataTypeRegistry::global();
        let a = registry.resolve("varchar").unwrap();
        let b = registry.resolve("VARCHAR").unwrap();
        assert!(std::ptr::eq(a, b));
        assert_eq!(registry.resolve("character  varying").unwrap().canonical_name, "VARCHAR");
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = DataTypeRegistry::global();
        assert!(registry.resolve("not_a_type").is_none());
        assert!(registry.resolve("").is_none());
    }

    #[test]
    fn test_resolve_strips_arguments_and_arrays() {
        let registry = DataTypeRegistry::global();
        assert_eq!(registry.resolve("DECIMAL(10, 2)").unwrap().canonical_name, "DECIMAL");
        assert_eq!(registry.resolve("integer[]").unwrap().canonical_name, "ARRAY");
    }

    #[test]
    fn test_aliases_are_unique() {
        let registry = DataTypeRegistry::new();
        let mut seen = std::collections::HashSet::new();
        for descriptor in registry.iter() {
            assert!(seen.insert(descriptor.canonical_name.to_uppercase()));
            for alias in &descriptor.aliases {
                assert!(seen.insert(alias.to_uppercase()), "duplicate alias {alias}");
            }
        }
    }

    #[test]
    fn test_conversion_targets_exist_in_their_dialect() {
        let registry = DataTypeRegistry::new();
        for descriptor in registry.iter() {
            for (dialect, target) in &descriptor.conversion_rules {
                let resolved = registry.resolve(target).unwrap_or_else(|| {
                    panic!("{} -> {target} unknown", descriptor.canonical_name)
                });
                assert!(
                    resolved.supports(dialect),
                    "{} -> {target} not in {dialect}",
                    descriptor.canonical_name
                );
            }
        }
    }

    #[test]
    fn test_sqlite_storage_classes() {
        let registry = DataTypeRegistry::global();
        let names: Vec<&str> = registry
            .types_in_dialect("sqlite3")
            .iter()
            .map(|d| d.canonical_name.as_str())
            .collect();
        assert_eq!(names, ["INTEGER", "NUMERIC", "REAL", "TEXT", "BLOB"]);
        assert!(registry.types_in_dialect("cobol").is_empty());
    }

    #[test]
    fn test_find_compatible_prefers_rule_target() {
        let registry = DataTypeRegistry::global();
        let found = registry.find_compatible("UUID", "sqlserver");
        assert_eq!(found[0].canonical_name, "UNIQUEIDENTIFIER");
        let found = registry.find_compatible("BOOLEAN", "postgres");
        assert_eq!(found[0].canonical_name, "BOOLEAN");
        assert!(registry.find_compatible("nope", "mysql").is_empty());
    }

    #[test]
    fn test_find_compatible_falls_back_to_category() {
        let registry = DataTypeRegistry::global();
        let found = registry.find_compatible("TSVECTOR", "oracle");
        assert_eq!(found[0].canonical_name, "CLOB");
        let found = registry.find_compatible("ROWID", "mysql");
        assert!(found.is_empty());
    }

    #[test]
    fn test_suggest_integers() {
        let registry = DataTypeRegistry::global();
        let suggestions = registry.suggest_from_samples(&["1", "42", "NULL", ""], None);
        assert_eq!(suggestions[0].descriptor.canonical_name, "TINYINT");
        assert!(suggestions.len() <= MAX_SUGGESTIONS);
        assert!(suggestions.windows(2).all(|w| w[0].confidence >= w[1].confidence));
    }

    #[test]
    fn test_suggest_respects_dialect() {
        let registry = DataTypeRegistry::global();
        let samples = ["550e8400-e29b-41d4-a716-446655440000"];
        let pg = registry.suggest_from_samples(&samples, Some("postgresql"));
        assert_eq!(pg[0].descriptor.canonical_name, "UUID");
        let ms = registry.suggest_from_samples(&samples, Some("mssql"));
        assert_eq!(ms[0].descriptor.canonical_name, "UNIQUEIDENTIFIER");
        assert!(registry.suggest_from_samples(&samples, Some("cobol")).is_empty());
        assert!(registry.suggest_from_samples::<&str>(&[], None).is_empty());
    }

    #[test]
    fn test_conversion_paths() {
        let registry = DataTypeRegistry::global();
        assert_eq!(registry.conversion_path("int", "INTEGER"), Some(vec!["INTEGER"]));
        assert_eq!(registry.conversion_path("BOOLEAN", "BIT"), Some(vec!["BOOLEAN", "BIT"]));
        assert_eq!(registry.conversion_path("TINYINT", "BIGINT"), Some(vec!["TINYINT", "BIGINT"]));
        assert_eq!(
            registry.conversion_path("BIT", "NUMBER"),
            Some(vec!["BIT", "NUMBER"])
        );
        assert_eq!(registry.conversion_path("INET", "UUID"), None);
        assert_eq!(registry.conversion_path("missing", "UUID"), None);
    }

    #[test]
    fn test_conversion_path_through_intermediate() {
        let registry = DataTypeRegistry::global();
        assert_eq!(
            registry.conversion_path("CIDR", "VARCHAR2"),
            Some(vec!["CIDR", "VARCHAR2"])
        );
        assert_eq!(
            registry.conversion_path("SQL_VARIANT", "CLOB"),
            Some(vec!["SQL_VARIANT", "TSVECTOR", "CLOB"])
        );
    }
}
