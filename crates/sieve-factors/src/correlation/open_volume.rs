//! Open/Volume Correlation Factor

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use sieve_panel::{ByEntity, DATE, OPEN, Projection, SYMBOL, VOLUME};

use crate::traits::finish;
use crate::{ConfigurableFactor, Factor, FactorCategory, Result};

/// Configuration for the open/volume correlation factor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenVolumeCorrConfig {
    /// Rolling correlation window in days (default: 10)
    pub window: usize,
}

impl Default for OpenVolumeCorrConfig {
    fn default() -> Self {
        Self { window: 10 }
    }
}

/// `corr₁₀(open, volume)` per symbol
#[derive(Debug, Default)]
pub struct OpenVolumeCorrFactor {
    config: OpenVolumeCorrConfig,
}

impl Factor for OpenVolumeCorrFactor {
    fn name(&self) -> &'static str {
        "alpha09"
    }

    fn description(&self) -> &'static str {
        "Rolling correlation of open and volume"
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Correlation
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[DATE, SYMBOL, OPEN, VOLUME]
    }

    fn projections(&self) -> &'static [Projection] {
        &[Projection::ByEntity]
    }

    fn lookback(&self) -> usize {
        self.config.window
    }

    fn compute_scores(&self, data: LazyFrame) -> Result<LazyFrame> {
        let name = self.name();
        let scores = data.with_columns([ByEntity::rolling_corr(
            col(OPEN),
            col(VOLUME),
            self.config.window,
        )
        .alias(name)]);
        Ok(finish(scores, name))
    }
}

impl ConfigurableFactor for OpenVolumeCorrFactor {
    type Config = OpenVolumeCorrConfig;

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

    #[test]
    fn test_flat_open_gives_no_scores() {
        let data = df![
            "symbol" => ["A"; 12],
            "date" => (1..=12).map(|d| format!("2024-01-{d:02}")).collect::<Vec<_>>(),
            "open" => [0.1; 12],
            "volume" => [5.0, 9.0, 2.0, 7.0, 4.0, 8.0, 1.0, 6.0, 3.0, 11.0, 12.0, 10.0]
        ]
        .unwrap();

        let out = OpenVolumeCorrFactor::default()
            .compute_scores(data.lazy())
            .unwrap()
            .collect()
            .unwrap();
        let scores = out.column("alpha09").unwrap();
        assert_eq!(scores.null_count(), 12);
    }
}
