//! Error types for factor selection and combination.

use thiserror::Error;

/// Result type for selection operations.
pub type Result<T> = std::result::Result<T, SelectError>;

/// Errors raised while selecting or combining factors.
#[derive(Debug, Error)]
pub enum SelectError {
    /// No complete row is left to fit the importance model on
    #[error("Insufficient data: all {rows_dropped} rows contain undefined values")]
    InsufficientData {
        /// Rows dropped for undefined values
        rows_dropped: usize,
    },

    /// The table carries no factor columns
    #[error("Factor table has no factor columns")]
    NoFactors,

    /// A selected factor is not a column of the table
    #[error("Unknown factor: {0}")]
    UnknownFactor(String),

    /// Combination was asked for with no factors
    #[error("No factors selected")]
    EmptySelection,

    /// Feature matrix, label and importance lengths disagree
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Array shape error
    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}
