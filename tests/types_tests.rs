// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use pretty_assertions::assert_eq;
use sql_review::datatype::{
    DataTypeCategory, DataTypeDescriptor, DataTypeRegistry, MAX_SUGGESTIONS
};

fn registry() -> &'static DataTypeRegistry {
    DataTypeRegistry::global()
}

fn names<'a>(descriptors: impl IntoIterator<Item = &'a DataTypeDescriptor>) -> Vec<&'a str> {
    descriptors
        .into_iter()
        .map(|d| d.canonical_name.as_str())
        .collect()
}

#[test]
fn test_resolve_aliases_and_arguments() {
    assert_eq!(registry().resolve("int4").unwrap().canonical_name.as_str(), "INTEGER");
    assert_eq!(registry().resolve("Varchar(255)").unwrap().canonical_name.as_str(), "VARCHAR");
    assert_eq!(registry().resolve("integer[]").unwrap().canonical_name.as_str(), "ARRAY");
    assert!(registry().resolve("no_such_type").is_none());
    assert!(registry().resolve("").is_none());
}

#[test]
fn test_every_alias_resolves_to_its_owner() {
    for descriptor in registry().iter() {
        for alias in &descriptor.aliases {
            let resolved = registry().resolve(alias).unwrap();
            assert_eq!(resolved.canonical_name, descriptor.canonical_name);
        }
    }
}

#[test]
fn test_conversion_targets_exist_in_their_dialect() {
    for descriptor in registry().iter() {
        for (dialect, target) in &descriptor.conversion_rules {
            let target = registry()
                .resolve(target)
                .unwrap_or_else(|| panic!("{} -> {} unresolved", descriptor.canonical_name, target));
            assert!(
                target.supports(dialect),
                "{} converts to {} which {} lacks",
                descriptor.canonical_name,
                target.canonical_name,
                dialect
            );
        }
    }
}

#[test]
fn test_sqlite_storage_classes() {
    assert_eq!(
        names(registry().types_in_dialect("sqlite")),
        vec!["INTEGER", "NUMERIC", "REAL", "TEXT", "BLOB"]
    );
    assert!(registry().types_in_dialect("informix").is_empty());
}

#[test]
fn test_types_in_category() {
    let uuid = names(registry().types_in_category(DataTypeCategory::Uuid));
    assert_eq!(uuid, vec!["UUID", "UNIQUEIDENTIFIER"]);
}

#[test]
fn test_find_compatible_prefers_source_then_rule() {
    let found = names(registry().find_compatible("UUID", "postgresql"));
    assert_eq!(found[0], "UUID");
    let found = names(registry().find_compatible("UUID", "sqlserver"));
    assert_eq!(found[0], "UNIQUEIDENTIFIER");
    assert!(registry().find_compatible("UUID", "nowhere").is_empty());
    assert!(registry().find_compatible("nothing", "mysql").is_empty());
}

#[test]
fn test_suggest_from_samples() {
    let suggestions = registry().suggest_from_samples(&["2024-01-01", "2023-12-31"], None);
    assert_eq!(suggestions[0].descriptor.category, DataTypeCategory::DateTime);
    assert!(suggestions.len() <= MAX_SUGGESTIONS);
    assert!(
        suggestions
            .windows(2)
            .all(|w| w[0].confidence >= w[1].confidence)
    );
}

#[test]
fn test_suggest_ignores_nulls_and_blanks() {
    let with_nulls = registry().suggest_from_samples(&["42", "NULL", "", "7"], None);
    let without = registry().suggest_from_samples(&["42", "7"], None);
    assert_eq!(
        names(with_nulls.iter().map(|s| s.descriptor)),
        names(without.iter().map(|s| s.descriptor))
    );
    assert!(registry().suggest_from_samples::<&str>(&[], None).is_empty());
}

#[test]
fn test_conversion_path() {
    assert_eq!(registry().conversion_path("int", "INTEGER"), Some(vec!["INTEGER"]));
    assert_eq!(
        registry().conversion_path("JSONB", "TEXT"),
        Some(vec!["JSONB", "TEXT"])
    );
    assert!(registry().conversion_path("INTEGER", "nope").is_none());
}
