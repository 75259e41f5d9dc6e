//! Parameter and result types of CLI commands.

use crate::cli::{Dialect, Format};

/// Parameters for the analyze command.
///
/// Options left as `None` fall back to the loaded configuration.
///
/// # Example
///
/// ```
/// use sql_review::{
///     app::AnalyzeParams,
///     cli::{Dialect, Format}
/// };
///
/// let params = AnalyzeParams {
///     files:         vec!["schema.sql".to_string(), "queries.sql".to_string()],
///     dialect:       Some(Dialect::Postgresql),
///     output_format: Format::Json,
///     no_color:      true,
///     strict:        false,
///     min_score:     Some(80),
///     verbose:       false
/// };
/// assert_eq!(params.files.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct AnalyzeParams {
    /// Input paths; "-" reads stdin.
    pub files:         Vec<String>,
    /// Dialect overriding the configured one.
    pub dialect:       Option<Dialect>,
    pub output_format: Format,
    pub no_color:      bool,
    /// Enables the strict parser pass; never disables a configured one.
    pub strict:        bool,
    /// Minimum acceptable quality score per input.
    pub min_score:     Option<u8>,
    pub verbose:       bool
}

/// Rendered output of a command and the process exit code it implies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// 0 = clean, 1 = medium findings or lookup miss, 2 = high/critical
    /// findings or score below the minimum.
    pub exit_code: i32,
    pub output:    String
}

impl CommandResult {
    pub fn new(exit_code: i32, output: impl Into<String>) -> Self {
        Self {
            exit_code,
            output: output.into()
        }
    }
}
