//! Error types for panel operations.

use thiserror::Error;

/// Result type for panel operations.
pub type Result<T> = std::result::Result<T, PanelError>;

/// Errors that can occur while building, validating or persisting a panel.
#[derive(Debug, Error)]
pub enum PanelError {
    /// A required raw field is absent from the panel
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the absent column
        field: String,
    },

    /// The (date, symbol) index contains duplicates
    #[error("Duplicate index entries: {count} (date, symbol) pairs appear more than once")]
    DuplicateIndex {
        /// Number of duplicated pairs
        count: usize,
    },

    /// Unsupported file extension for frame I/O
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid date range
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date of the range
        start: String,
        /// End date of the range
        end: String,
    },

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
