//! Hard failures of the reviewer.
//!
//! The analysis engine itself never fails on SQL input: unparseable
//! fragments, unknown types and malformed statements all surface as
//! findings. Only input that cannot be treated as SQL text at all (files
//! that cannot be read, binary data, oversized documents) and broken
//! configuration reach the caller as [`AppError`].

pub use masterror::{AppError, AppResult};

/// Create file read error
pub fn file_read_error(path: &str, source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to read file '{}': {}", path, source))
}

/// Create config error
pub fn config_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}

/// Create error for input exceeding the configured size limit
pub fn input_too_large_error(source: &str, size: usize, limit: usize) -> AppError {
    AppError::bad_request(format!(
        "Input '{}' is {} bytes, exceeding the limit of {} bytes",
        source, size, limit
    ))
}

/// Create error for input that looks like binary data
pub fn binary_input_error(source: &str, offset: usize) -> AppError {
    AppError::bad_request(format_input_error(
        "Binary input rejected",
        source,
        &format!("NUL byte at offset {}", offset)
    ))
}

/// Create error for an unrecognized dialect identifier
pub fn unknown_dialect_error(name: &str) -> AppError {
    AppError::bad_request(format!(
        "Unknown SQL dialect '{}' (expected one of: generic, mysql, postgresql, sqlite, sqlserver, oracle)",
        name
    ))
}

fn format_input_error(prefix: &str, source: &str, detail: &str) -> String {
    if source.is_empty() {
        format!("{}:\n  {}", prefix, detail)
    } else {
        format!("{} ({}):\n  {}", prefix, source, detail)
    }
}
