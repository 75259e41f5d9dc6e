//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. `.sql-review.toml` in current directory
//! 4. `~/.config/sql-review/config.toml`
//! 5. Default values
//!
//! # Configuration File Format
//!
//! ```toml
//! [analysis]
//! dialect = "postgresql"       # generic, mysql, postgresql, sqlite, sqlserver, oracle
//! strict = false               # also run every statement through sqlparser
//! snippet_width = 120
//! max_input_bytes = 10485760
//!
//! [rules]
//! disabled = ["PERF006"]
//!
//! [rules.severity]
//! PERF001 = "low"
//! SCH001 = "high"
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `SQL_REVIEW_DIALECT` | Target dialect |
//! | `SQL_REVIEW_STRICT` | `1`/`true` enables the strict parser pass |

use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf}
};

use serde::{Deserialize, Deserializer, de};

use crate::{
    dialect::SqlDialect,
    error::{AppResult, config_error}
};

/// Local configuration file name
pub const LOCAL_CONFIG: &str = ".sql-review.toml";

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub rules:    RulesConfig
}

/// Settings of a single analysis run
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Dialect used for type support checks and the strict parser pass
    #[serde(deserialize_with = "deserialize_dialect")]
    pub dialect:         SqlDialect,
    /// Parse every statement with sqlparser and report failures
    pub strict:          bool,
    /// Maximum snippet length in findings
    pub snippet_width:   usize,
    /// Inputs above this size are rejected before analysis
    pub max_input_bytes: usize
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            dialect:         SqlDialect::Generic,
            strict:          false,
            snippet_width:   120,
            max_input_bytes: 10 * 1024 * 1024
        }
    }
}

impl AnalysisConfig {
    /// Dialect identifier for the type registry, `None` for generic SQL
    pub fn target_dialect(&self) -> Option<&'static str> {
        (self.dialect != SqlDialect::Generic).then(|| self.dialect.as_str())
    }
}

/// Rules configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RulesConfig {
    /// Disabled rule IDs
    #[serde(default)]
    pub disabled: Vec<String>,
    /// Severity overrides (rule_id -> severity)
    #[serde(default)]
    pub severity: HashMap<String, String>
}

impl RulesConfig {
    pub fn is_disabled(&self, rule_id: &str) -> bool {
        self.disabled.iter().any(|d| d.eq_ignore_ascii_case(rule_id))
    }
}

fn deserialize_dialect<'de, D>(deserializer: D) -> Result<SqlDialect, D::Error>
where
    D: Deserializer<'de>
{
    let name = String::deserialize(deserializer)?;
    SqlDialect::parse_lenient(&name)
        .ok_or_else(|| de::Error::custom(format!("unknown SQL dialect '{}'", name)))
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file in current directory (.sql-review.toml)
    /// 3. Config file in home directory (~/.config/sql-review/config.toml)
    /// 4. Default values
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("sql-review")
                .join("config.toml");
            if home_config.exists() {
                config = Self::from_path(&home_config)?;
            }
        }

        let local_config = PathBuf::from(LOCAL_CONFIG);
        if local_config.exists() {
            config = Self::from_path(&local_config)?;
        }

        config.apply_env()?;
        Ok(config)
    }

    /// Load configuration, replacing the default file locations with
    /// `path` when given. Environment variables apply either way.
    pub fn load_from(path: Option<&Path>) -> AppResult<Self> {
        match path {
            Some(path) => {
                let mut config = Self::from_path(path)?;
                config.apply_env()?;
                Ok(config)
            }
            None => Self::load()
        }
    }

    /// Load configuration from an explicit file, without the environment
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| config_error(format!("Invalid config file: {}", e)))
    }

    fn apply_env(&mut self) -> AppResult<()> {
        if let Ok(dialect) = env::var("SQL_REVIEW_DIALECT") {
            self.analysis.dialect = dialect.parse()?;
        }
        if let Ok(strict) = env::var("SQL_REVIEW_STRICT") {
            self.analysis.strict = parse_flag(&strict).ok_or_else(|| {
                config_error(format!("SQL_REVIEW_STRICT must be a boolean, got '{}'", strict))
            })?;
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None
    }
}
