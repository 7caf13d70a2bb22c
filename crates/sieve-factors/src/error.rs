//! Error types for factor computation.

use sieve_panel::PanelError;
use thiserror::Error;

/// Result type for factor operations.
pub type Result<T> = std::result::Result<T, FactorError>;

/// Errors that can occur while computing factors or building a factor table.
#[derive(Debug, Error)]
pub enum FactorError {
    /// A column the factor reads is absent from the panel
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the absent column
        field: String,
    },

    /// No factor is registered under this name
    #[error("Unknown factor: {0}")]
    UnknownFactor(String),

    /// A factor produced a frame that does not line up with the panel
    #[error("Factor {factor} returned {actual} rows, expected {expected}")]
    Misaligned {
        /// Factor name
        factor: String,
        /// Panel height
        expected: usize,
        /// Returned height
        actual: usize,
    },

    /// Expression evaluation failed
    #[error("Computation error: {0}")]
    Computation(#[from] polars::prelude::PolarsError),

    /// Panel error
    #[error("Panel error: {0}")]
    Panel(PanelError),
}

impl From<PanelError> for FactorError {
    fn from(err: PanelError) -> Self {
        match err {
            PanelError::MissingField { field } => Self::MissingField { field },
            PanelError::Polars(err) => Self::Computation(err),
            other => Self::Panel(other),
        }
    }
}
