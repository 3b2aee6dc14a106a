//! Crate-wide error type.
//!
//! Every fatal condition of a report run ends up here. There is no partial
//! success: either a full [`crate::analytics::ViewingReport`] is produced or
//! one of these errors is returned to the caller.

use std::path::PathBuf;
use thiserror::Error;

use crate::analytics::report::ReportError;

/// Errors raised while loading, analysing or reporting a viewing history.
#[derive(Error, Debug)]
pub enum ViewstatsError {
    /// A date field did not match `DD/MM/YYYY`
    #[error("Malformed date '{value}' at line {line} (expected DD/MM/YYYY)")]
    MalformedDate { line: usize, value: String },

    /// Nothing usable to compute metrics from
    #[error("Insufficient data: {context}")]
    EmptyDataset { context: String },

    /// I/O error with the path that caused it
    #[error("File I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Input does not look like a viewing history export
    #[error("Invalid file format: {reason}")]
    InvalidFormat { reason: String },

    /// Configuration could not be read or is invalid
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// Report rendering or writing failed
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

impl ViewstatsError {
    /// Create a malformed date error
    pub fn malformed_date(line: usize, value: impl Into<String>) -> Self {
        Self::MalformedDate {
            line,
            value: value.into(),
        }
    }

    /// Create an empty dataset error
    pub fn empty_dataset(context: impl Into<String>) -> Self {
        Self::EmptyDataset {
            context: context.into(),
        }
    }

    /// Create an I/O error bound to a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid format error
    pub fn invalid_format(reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

/// Result alias used across the crate
pub type ViewstatsResult<T> = Result<T, ViewstatsError>;
