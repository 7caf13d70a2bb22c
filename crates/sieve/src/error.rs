//! Pipeline error type.

use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors raised by any stage of the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Loading or validating a panel failed
    #[error(transparent)]
    Panel(#[from] sieve_panel::PanelError),

    /// Computing factors failed
    #[error(transparent)]
    Factor(#[from] sieve_factors::FactorError),

    /// Backtesting failed
    #[error(transparent)]
    Backtest(#[from] sieve_eval::BacktestError),

    /// Selection or combination failed
    #[error(transparent)]
    Select(#[from] sieve_select::SelectError),

    /// Writing results failed
    #[error(transparent)]
    Export(#[from] sieve_output::ExportError),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Configuration file could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
