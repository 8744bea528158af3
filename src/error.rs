//! Error types for TEP data set import.

use std::path::PathBuf;

use thiserror::Error;

/// Why a requested data set index was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum IndexError {
    /// The value is not an integer (floats are rejected even when whole).
    #[error("expected an integer value, got {0}")]
    NotInteger(f64),

    /// The value is an integer outside `0..=21`.
    #[error("expected an integer between 0 and 21, got {0}")]
    OutOfRange(i64),
}

/// TEP import error types.
#[derive(Error, Debug)]
pub enum TepError {
    /// Configured base path is missing or not a directory
    #[error("not a directory: {}", path.display())]
    InvalidDirectory { path: PathBuf },

    /// An expected data set file is absent
    #[error("data set file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// File contents are not a well-formed numeric matrix
    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Rejected data set index
    #[error("invalid data set index: {0}")]
    InvalidIndex(#[from] IndexError),

    /// A value of the wrong kind where indices were expected
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Matrix dimensions unsuitable for the requested operation
    #[error("shape error: {0}")]
    Shape(String),

    /// Raised by an availability checker that refuses to continue
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

impl TepError {
    pub(crate) fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        TepError::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

/// Result type alias for TEP import operations.
pub type Result<T> = std::result::Result<T, TepError>;
