//! Label Reversal Factor
//!
//! Negated return realized over the previous period. The label at `t` is the
//! forward return from `t`, so lagging it by one row yields a value already
//! known at `t`.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use sieve_panel::{ByEntity, DATE, LABEL, Projection, SYMBOL};

use crate::traits::finish;
use crate::{ConfigurableFactor, Factor, FactorCategory, Result};

/// Configuration for the label reversal factor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelReversalConfig {
    /// Lag in rows (default: 1)
    pub lag: usize,
}

impl Default for LabelReversalConfig {
    fn default() -> Self {
        Self { lag: 1 }
    }
}

/// `-lag(label)` per symbol
#[derive(Debug, Default)]
pub struct LabelReversalFactor {
    config: LabelReversalConfig,
}

impl Factor for LabelReversalFactor {
    fn name(&self) -> &'static str {
        "alpha03"
    }

    fn description(&self) -> &'static str {
        "Negated previous-period return"
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Reversal
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[DATE, SYMBOL, LABEL]
    }

    fn projections(&self) -> &'static [Projection] {
        &[Projection::ByEntity]
    }

    fn lookback(&self) -> usize {
        self.config.lag
    }

    fn compute_scores(&self, data: LazyFrame) -> Result<LazyFrame> {
        let name = self.name();
        let scores = data.with_columns([
            (lit(-1.0) * ByEntity::lag(col(LABEL), self.config.lag as i64)).alias(name),
        ]);
        Ok(finish(scores, name))
    }
}

impl ConfigurableFactor for LabelReversalFactor {
    type Config = LabelReversalConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
