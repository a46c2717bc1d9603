//! Error handling for FHEM log processing.
//!
//! Only file-level failures are errors. Per-line problems are carried as
//! [`crate::models::RejectReason`] values and never abort a file.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FhemError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Pattern compilation failed: {0}")]
    Regex(#[from] regex::Error),

    #[error("Log file unavailable: {path} - {source}")]
    FileUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Log file is empty: {path}")]
    EmptyInput { path: PathBuf },

    #[error("No log files found for pattern: {pattern}")]
    NoFilesFound { pattern: String },

    #[error("Invalid file pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Export failed for {path} - {reason}")]
    Export { path: PathBuf, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl FhemError {
    /// True for the zero-byte case, which callers treat as "no data" rather than failure
    pub fn is_empty_input(&self) -> bool {
        matches!(self, FhemError::EmptyInput { .. })
    }
}

pub type Result<T> = std::result::Result<T, FhemError>;
