//! Rank Correlation Factors
//!
//! `−corr_w(csrank(x), csrank(volume))`: symbols whose relative price level
//! moves with their relative volume score low.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use sieve_panel::{ByDate, ByEntity, DATE, OPEN, Projection, SYMBOL, VOLUME, VWAP};

use crate::traits::finish;
use crate::{ConfigurableFactor, Factor, FactorCategory, Result};

/// Negated rolling correlation of the per-date percentile ranks of `x` and `y`.
///
/// The ranks are materialized before the rolling step so the two
/// projections never nest.
pub fn rank_correlation(data: LazyFrame, x: &str, y: &str, window: usize, name: &str) -> LazyFrame {
    let rank_x = format!("{name}_rank_{x}");
    let rank_y = format!("{name}_rank_{y}");
    let scores = data
        .with_columns([
            ByDate::pct_rank(col(x)).alias(rank_x.as_str()),
            ByDate::pct_rank(col(y)).alias(rank_y.as_str()),
        ])
        .with_columns([(lit(-1.0)
            * ByEntity::rolling_corr(col(rank_x.as_str()), col(rank_y.as_str()), window))
        .alias(name)]);
    finish(scores, name)
}

/// Configuration shared by the rank correlation factors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankCorrConfig {
    /// Rolling correlation window in days
    pub window: usize,
}

impl Default for RankCorrConfig {
    fn default() -> Self {
        Self { window: 10 }
    }
}

/// `−corr₁₀(csrank(open), csrank(volume))`
#[derive(Debug)]
pub struct OpenVolumeRankCorrFactor {
    config: RankCorrConfig,
}

impl Default for OpenVolumeRankCorrFactor {
    fn default() -> Self {
        Self::with_config(RankCorrConfig { window: 10 })
    }
}

impl Factor for OpenVolumeRankCorrFactor {
    fn name(&self) -> &'static str {
        "alpha04"
    }

    fn description(&self) -> &'static str {
        "Negated rolling correlation of open rank and volume rank"
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Correlation
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[DATE, SYMBOL, OPEN, VOLUME]
    }

    fn projections(&self) -> &'static [Projection] {
        &[Projection::ByDate, Projection::ByEntity]
    }

    fn lookback(&self) -> usize {
        self.config.window
    }

    fn compute_scores(&self, data: LazyFrame) -> Result<LazyFrame> {
        Ok(rank_correlation(data, OPEN, VOLUME, self.config.window, self.name()))
    }
}

impl ConfigurableFactor for OpenVolumeRankCorrFactor {
    type Config = RankCorrConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

/// `−corr₅(csrank(vwap), csrank(volume))`
#[derive(Debug)]
pub struct VwapVolumeRankCorrFactor {
    config: RankCorrConfig,
}

impl Default for VwapVolumeRankCorrFactor {
    fn default() -> Self {
        Self::with_config(RankCorrConfig { window: 5 })
    }
}

impl Factor for VwapVolumeRankCorrFactor {
    fn name(&self) -> &'static str {
        "alpha06"
    }

    fn description(&self) -> &'static str {
        "Negated rolling correlation of vwap rank and volume rank"
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Correlation
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[DATE, SYMBOL, VWAP, VOLUME]
    }

    fn projections(&self) -> &'static [Projection] {
        &[Projection::ByDate, Projection::ByEntity]
    }

    fn lookback(&self) -> usize {
        self.config.window
    }

    fn compute_scores(&self, data: LazyFrame) -> Result<LazyFrame> {
        Ok(rank_correlation(data, VWAP, VOLUME, self.config.window, self.name()))
    }
}

impl ConfigurableFactor for VwapVolumeRankCorrFactor {
    type Config = RankCorrConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rank_correlation_of_aligned_ranks() {
        // On every date A has the lower open and the lower volume until d3,
        // where the volume ranks flip.
        let data = df![
            "symbol" => ["A", "A", "A", "B", "B", "B"],
            "date" => ["d1", "d2", "d3", "d1", "d2", "d3"],
            "open" => [1.0, 1.0, 1.0, 2.0, 2.0, 2.0],
            "volume" => [10.0, 10.0, 30.0, 20.0, 20.0, 20.0]
        ]
        .unwrap();

        let out = rank_correlation(data.lazy(), "open", "volume", 2, "rc")
            .collect()
            .unwrap();
        let values: Vec<Option<f64>> = out
            .column("rc")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect();

        // Open ranks are constant per symbol, so every full window has zero
        // variance on one side.
        assert!(values.iter().all(Option::is_none));

        let data = df![
            "symbol" => ["A", "A", "B", "B"],
            "date" => ["d1", "d2", "d1", "d2"],
            "open" => [1.0, 3.0, 2.0, 2.0],
            "volume" => [10.0, 30.0, 20.0, 20.0]
        ]
        .unwrap();
        let out = rank_correlation(data.lazy(), "open", "volume", 2, "rc")
            .collect()
            .unwrap();
        let a = out
            .column("rc")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .get(1)
            .unwrap();
        assert_relative_eq!(a, -1.0, epsilon = 1e-9);
    }
}
