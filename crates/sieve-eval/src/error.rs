//! Error types for backtest evaluation.

use thiserror::Error;

/// Result type for backtest operations.
pub type Result<T> = std::result::Result<T, BacktestError>;

/// Errors raised by an evaluation.
///
/// Degenerate dates (a single entity, a constant factor, zero variance) are
/// not errors: the affected statistic is undefined and aggregation skips it.
#[derive(Debug, Error)]
pub enum BacktestError {
    /// The factor and label frames share no (date, symbol) pair
    #[error("No overlapping (date, symbol) rows between factor {factor} and the label")]
    NoOverlap {
        /// Factor column name
        factor: String,
    },

    /// A requested column is absent
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the absent column
        field: String,
    },

    /// The bucket count must be at least one
    #[error("Invalid bucket count: {0}")]
    InvalidBuckets(usize),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Panel error
    #[error("Panel error: {0}")]
    Panel(#[from] sieve_panel::PanelError),
}
