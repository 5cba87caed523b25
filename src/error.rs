//! Error types for the settlement engine.

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur during engine operation.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to open or read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Tolerance argument was not a non-negative integer
    #[error("Invalid tolerance '{0}': expected a non-negative number of days")]
    InvalidTolerance(String),

    /// Missing input file argument
    #[error("Missing input file argument. Usage: ledger-settle <input.csv> [tolerance_days]")]
    MissingArgument,
}
