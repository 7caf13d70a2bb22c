//! Low/Close Ratio Factor

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use sieve_panel::{CLOSE, DATE, LOW, Projection, SYMBOL};

use crate::{ConfigurableFactor, Factor, FactorCategory, Result};

/// Configuration for the low/close ratio factor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowCloseRatioConfig {
    /// Rolling window in days (default: 5)
    pub window: usize,
}

impl Default for LowCloseRatioConfig {
    fn default() -> Self {
        Self { window: 5 }
    }
}

/// Five-day mean of the low-to-close ratio
#[derive(Debug, Default)]
pub struct LowCloseRatioFactor {
    config: LowCloseRatioConfig,
}

impl Factor for LowCloseRatioFactor {
    fn name(&self) -> &'static str {
        "alpha02"
    }

    fn description(&self) -> &'static str {
        "Rolling mean of low / close"
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::PriceRatio
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[DATE, SYMBOL, LOW, CLOSE]
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
            LOW,
            self.config.window,
            self.name(),
        ))
    }
}

impl ConfigurableFactor for LowCloseRatioFactor {
    type Config = LowCloseRatioConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
