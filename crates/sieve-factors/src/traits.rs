//! Core trait definitions for factors.
//!
//! A factor turns the panel into one value per (date, symbol). Every factor
//! is built from [`ByEntity`](sieve_panel::ByEntity) and
//! [`ByDate`](sieve_panel::ByDate) expressions and declares which of the two
//! projections it reads.

use polars::prelude::*;
use sieve_panel::{DATE, Panel, Projection, SYMBOL};
use tracing::debug;

use crate::{FactorCategory, FactorError, Result};

/// A derived signal computed from the panel.
pub trait Factor: Send + Sync + std::fmt::Debug {
    /// Unique identifier, also the column name in the factor table.
    fn name(&self) -> &'static str;

    /// Human-readable description of what this factor measures.
    fn description(&self) -> &'static str;

    /// Factor category for grouping.
    fn category(&self) -> FactorCategory;

    /// Panel columns the factor reads.
    fn required_columns(&self) -> &'static [&'static str];

    /// Projections the factor's transforms are partitioned by.
    fn projections(&self) -> &'static [Projection];

    /// Rows of per-symbol history needed before the first defined value.
    fn lookback(&self) -> usize;

    /// Build the factor over a (symbol, date)-sorted panel.
    ///
    /// The returned frame has the columns `date`, `symbol` and [`Self::name`],
    /// one row per input row in input order.
    fn compute_scores(&self, data: LazyFrame) -> Result<LazyFrame>;

    /// Compute the factor over a validated panel.
    ///
    /// # Errors
    ///
    /// [`FactorError::MissingField`] if a required column is absent.
    fn compute(&self, panel: &Panel) -> Result<DataFrame> {
        panel.require(self.required_columns())?;
        let scores = self.compute_scores(panel.lazy())?.collect()?;
        if scores.height() != panel.height() {
            return Err(FactorError::Misaligned {
                factor: self.name().to_string(),
                expected: panel.height(),
                actual: scores.height(),
            });
        }
        debug!(factor = self.name(), rows = scores.height(), "computed factor");
        Ok(scores)
    }
}

/// Marker trait for factor configuration types.
pub trait FactorConfig: Default + Clone + Send + Sync + std::fmt::Debug {}

impl<T: Default + Clone + Send + Sync + std::fmt::Debug> FactorConfig for T {}

/// A factor whose windows can be changed at construction.
pub trait ConfigurableFactor: Factor {
    /// Configuration type for this factor.
    type Config: FactorConfig;

    /// Create the factor with the given configuration.
    fn with_config(config: Self::Config) -> Self;

    /// Returns the current configuration.
    fn config(&self) -> &Self::Config;
}

/// Keep the index and the named score column.
pub(crate) fn finish(data: LazyFrame, name: &str) -> LazyFrame {
    data.select([col(DATE), col(SYMBOL), col(name)])
}
