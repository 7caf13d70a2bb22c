//! Price Change Factor
//!
//! Percentage change of the close over a fixed number of rows. Undefined,
//! never infinite, when the lagged close is zero.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use sieve_panel::{ByEntity, CLOSE, DATE, Projection, SYMBOL, ratio};

use crate::traits::finish;
use crate::{ConfigurableFactor, Factor, FactorCategory, Result};

/// Configuration for the price change factor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceChangeConfig {
    /// Lag in rows (default: 6)
    pub lag: usize,
    /// Multiplier applied to the fractional change (default: 100)
    pub scale: f64,
}

impl Default for PriceChangeConfig {
    fn default() -> Self {
        Self {
            lag: 6,
            scale: 100.0,
        }
    }
}

/// `scale × (close − lag(close)) / lag(close)` per symbol
#[derive(Debug, Default)]
pub struct PriceChangeFactor {
    config: PriceChangeConfig,
}

impl Factor for PriceChangeFactor {
    fn name(&self) -> &'static str {
        "alpha07"
    }

    fn description(&self) -> &'static str {
        "Six-day percentage change of the close"
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Momentum
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[DATE, SYMBOL, CLOSE]
    }

    fn projections(&self) -> &'static [Projection] {
        &[Projection::ByEntity]
    }

    fn lookback(&self) -> usize {
        self.config.lag
    }

    fn compute_scores(&self, data: LazyFrame) -> Result<LazyFrame> {
        let name = self.name();
        let scores = data
            .with_columns([ByEntity::lag(col(CLOSE), self.config.lag as i64).alias("alpha07_lag")])
            .with_columns([(lit(self.config.scale)
                * ratio(col(CLOSE) - col("alpha07_lag"), col("alpha07_lag")))
            .alias(name)]);
        Ok(finish(scores, name))
    }
}

impl ConfigurableFactor for PriceChangeFactor {
    type Config = PriceChangeConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
