//! Type definitions for the data type registry.

use std::{fmt, str::FromStr};

use compact_str::CompactString;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use super::sample::SampleFormat;
use crate::dialect::SqlDialect;

/// Broad family a data type belongs to.
///
/// Compatibility lookups treat two types of the same category as mutually
/// convertible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataTypeCategory {
    Numeric,
    String,
    DateTime,
    Boolean,
    Binary,
    JsonXml,
    Spatial,
    Network,
    Uuid,
    Monetary,
    Interval,
    Enum,
    Composite,
    Other
}

impl DataTypeCategory {
    pub const ALL: [DataTypeCategory; 14] = [
        Self::Numeric,
        Self::String,
        Self::DateTime,
        Self::Boolean,
        Self::Binary,
        Self::JsonXml,
        Self::Spatial,
        Self::Network,
        Self::Uuid,
        Self::Monetary,
        Self::Interval,
        Self::Enum,
        Self::Composite,
        Self::Other
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::String => "string",
            Self::DateTime => "date-time",
            Self::Boolean => "boolean",
            Self::Binary => "binary",
            Self::JsonXml => "json/xml",
            Self::Spatial => "spatial",
            Self::Network => "network",
            Self::Uuid => "uuid",
            Self::Monetary => "monetary",
            Self::Interval => "interval",
            Self::Enum => "enum",
            Self::Composite => "composite",
            Self::Other => "other"
        }
    }
}

impl fmt::Display for DataTypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataTypeCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "numeric" | "number" => Ok(Self::Numeric),
            "string" | "text" => Ok(Self::String),
            "datetime" | "date" | "time" => Ok(Self::DateTime),
            "boolean" | "bool" => Ok(Self::Boolean),
            "binary" => Ok(Self::Binary),
            "jsonxml" | "json" | "xml" => Ok(Self::JsonXml),
            "spatial" | "geometry" => Ok(Self::Spatial),
            "network" => Ok(Self::Network),
            "uuid" => Ok(Self::Uuid),
            "monetary" | "money" => Ok(Self::Monetary),
            "interval" => Ok(Self::Interval),
            "enum" => Ok(Self::Enum),
            "composite" => Ok(Self::Composite),
            "other" => Ok(Self::Other),
            _ => Err(format!("unknown data type category '{}'", s))
        }
    }
}

/// Canonical description of one data type across dialects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataTypeDescriptor {
    /// Registry-wide normalized name
    pub canonical_name:     CompactString,
    pub category:           DataTypeCategory,
    /// Canonical dialect identifiers (`mysql`, `postgresql`, ...)
    pub supported_dialects: IndexSet<CompactString>,
    /// Alternative spellings, upper-cased
    pub aliases:            IndexSet<CompactString>,
    /// Preferred canonical type when moving to a dialect lacking this one
    pub conversion_rules:   IndexMap<CompactString, CompactString>,
    /// Validator used to infer the type from sample values
    #[serde(skip)]
    pub sample_format:      Option<SampleFormat>,
    /// Weight in `[0, 1]` favoring narrow types over catch-alls during
    /// inference
    pub specificity:        f32,
    /// Accepts a length argument (`VARCHAR(255)`)
    pub accepts_size:       bool,
    /// Accepts precision and scale (`DECIMAL(10, 2)`)
    pub accepts_precision:  bool
}

impl DataTypeDescriptor {
    /// Whether the type exists in `dialect` (aliases such as `postgres`
    /// are accepted)
    pub fn supports(&self, dialect: &str) -> bool {
        SqlDialect::normalize(dialect).is_some_and(|d| self.supported_dialects.contains(d))
    }

    /// Explicit conversion target for `dialect`, if any
    pub fn conversion_for(&self, dialect: &str) -> Option<&str> {
        let dialect = SqlDialect::normalize(dialect)?;
        self.conversion_rules.get(dialect).map(|t| t.as_str())
    }

    /// Whether some conversion rule points at `target`
    pub fn converts_to(&self, target: &str) -> bool {
        self.conversion_rules
            .values()
            .any(|t| t.eq_ignore_ascii_case(target))
    }
}

/// Result of sample-based type inference.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TypeSuggestion<'a> {
    pub descriptor: &'a DataTypeDescriptor,
    /// Score in `[0, 1]`
    pub confidence: f32
}
