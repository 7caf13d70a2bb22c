//! High/Close Ratio Factor
//!
//! Rolling mean of `high / close`. Values near one mean the symbol has been
//! closing at its highs.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use sieve_panel::{CLOSE, DATE, HIGH, Projection, SYMBOL};

use crate::{ConfigurableFactor, Factor, FactorCategory, Result};

/// Configuration for the high/close ratio factor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighCloseRatioConfig {
    /// Rolling window in days (default: 5)
    pub window: usize,
}

impl Default for HighCloseRatioConfig {
    fn default() -> Self {
        Self { window: 5 }
    }
}

/// Five-day mean of the high-to-close ratio
#[derive(Debug, Default)]
pub struct HighCloseRatioFactor {
    config: HighCloseRatioConfig,
}

impl Factor for HighCloseRatioFactor {
    fn name(&self) -> &'static str {
        "alpha01"
    }

    fn description(&self) -> &'static str {
        "Rolling mean of high / close"
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::PriceRatio
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[DATE, SYMBOL, HIGH, CLOSE]
    }

    fn projections(&self) -> &'static [Projection] {
        &[Projection::ByEntity]
    }

    fn lookback(&self) -> usize {
        self.config.window
    }

    fn compute_scores(&self, data: LazyFrame) -> Result<LazyFrame> {
        Ok(super::close_ratio_mean(
            data,
            HIGH,
            self.config.window,
            self.name(),
        ))
    }
}

impl ConfigurableFactor for HighCloseRatioFactor {
    type Config = HighCloseRatioConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
