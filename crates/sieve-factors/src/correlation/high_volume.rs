//! High/Volume Correlation Factor
//!
//! `−csrank(std₁₀(high)) × corr₁₀(high, volume)`. The per-symbol correlation
//! of highs with volume, weighted by how volatile the symbol's highs are
//! relative to the rest of the cross-section.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use sieve_panel::{ByDate, ByEntity, DATE, HIGH, Projection, SYMBOL, VOLUME};

use crate::traits::finish;
use crate::{ConfigurableFactor, Factor, FactorCategory, Result};

/// Configuration for the high/volume correlation factor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighVolumeCorrConfig {
    /// Window of the rolling standard deviation of highs (default: 10)
    pub std_window: usize,
    /// Window of the rolling high/volume correlation (default: 10)
    pub corr_window: usize,
}

impl Default for HighVolumeCorrConfig {
    fn default() -> Self {
        Self {
            std_window: 10,
            corr_window: 10,
        }
    }
}

/// Rank-weighted high/volume correlation
#[derive(Debug, Default)]
pub struct HighVolumeCorrFactor {
    config: HighVolumeCorrConfig,
}

impl Factor for HighVolumeCorrFactor {
    fn name(&self) -> &'static str {
        "alpha08"
    }

    fn description(&self) -> &'static str {
        "High/volume correlation weighted by the negated rank of high volatility"
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Correlation
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[DATE, SYMBOL, HIGH, VOLUME]
    }

    fn projections(&self) -> &'static [Projection] {
        &[Projection::ByEntity, Projection::ByDate]
    }

    fn lookback(&self) -> usize {
        self.config.std_window.max(self.config.corr_window)
    }

    fn compute_scores(&self, data: LazyFrame) -> Result<LazyFrame> {
        let name = self.name();
        let scores = data
            .with_columns([
                ByEntity::rolling_std(col(HIGH), self.config.std_window).alias("alpha08_std"),
                ByEntity::rolling_corr(col(HIGH), col(VOLUME), self.config.corr_window)
                    .alias("alpha08_corr"),
            ])
            .with_columns([ByDate::pct_rank(col("alpha08_std")).alias("alpha08_rank")])
            .with_columns([
                (lit(-1.0) * col("alpha08_rank") * col("alpha08_corr")).alias(name),
            ]);
        Ok(finish(scores, name))
    }
}

impl ConfigurableFactor for HighVolumeCorrFactor {
    type Config = HighVolumeCorrConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
