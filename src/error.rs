//! Error types for autostat.
//!
//! Only caller misuse surfaces as an error. Data quality problems (missing
//! values, infinities, tiny groups) degrade individual results instead.

use thiserror::Error;

/// All errors produced by autostat operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// CSV parsing failed.
    #[error("CSV parse error at line {line}: {message}")]
    CsvParse { line: usize, message: String },
    /// Column not found in DataFrame.
    #[error("column '{name}' not found")]
    ColumnNotFound { name: String },
    /// Column length does not match the DataFrame's row count.
    #[error("expected {expected} elements, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    /// A column with this name already exists.
    #[error("column '{name}' already exists")]
    DuplicateColumn { name: String },
    /// A parameter supplied by the caller is out of its valid domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// I/O error during file reading.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for StatsError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StatsError>;
