//! Intraday Dispersion Factors
//!
//! `−csrank(std_w(|close − open|) + (close − open) + corr₁₀(close, open))`.
//!
//! The body `close − open` and its absolute value are per-row quantities.
//! The rolling standard deviation and the close/open correlation run per
//! symbol, and the sum is ranked across symbols on each date.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use sieve_panel::{ByDate, ByEntity, CLOSE, DATE, OPEN, Projection, SYMBOL, abs};

use crate::traits::finish;
use crate::{ConfigurableFactor, Factor, FactorCategory, Result};

/// Build the dispersion score under `name`.
pub fn intraday_dispersion(
    data: LazyFrame,
    config: &IntradayDispersionConfig,
    name: &str,
) -> LazyFrame {
    let body = format!("{name}_body");
    let abs_body = format!("{name}_abs_body");
    let raw = format!("{name}_raw");
    let scores = data
        .with_columns([(col(CLOSE) - col(OPEN)).alias(body.as_str())])
        .with_columns([abs(col(body.as_str())).alias(abs_body.as_str())])
        .with_columns([(ByEntity::rolling_std(col(abs_body.as_str()), config.std_window)
            + col(body.as_str())
            + ByEntity::rolling_corr(col(CLOSE), col(OPEN), config.corr_window))
        .alias(raw.as_str())])
        .with_columns([(lit(-1.0) * ByDate::pct_rank(col(raw.as_str()))).alias(name)]);
    finish(scores, name)
}

/// Configuration for the intraday dispersion factors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntradayDispersionConfig {
    /// Window of the rolling standard deviation of the absolute body
    pub std_window: usize,
    /// Window of the rolling close/open correlation
    pub corr_window: usize,
}

impl Default for IntradayDispersionConfig {
    fn default() -> Self {
        Self {
            std_window: 10,
            corr_window: 10,
        }
    }
}

/// Ten-day intraday dispersion
#[derive(Debug)]
pub struct IntradayDispersionFactor {
    config: IntradayDispersionConfig,
}

impl Default for IntradayDispersionFactor {
    fn default() -> Self {
        Self::with_config(IntradayDispersionConfig {
            std_window: 10,
            corr_window: 10,
        })
    }
}

impl Factor for IntradayDispersionFactor {
    fn name(&self) -> &'static str {
        "alpha05"
    }

    fn description(&self) -> &'static str {
        "Negated rank of 10-day body dispersion plus body plus close/open correlation"
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Volatility
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[DATE, SYMBOL, OPEN, CLOSE]
    }

    fn projections(&self) -> &'static [Projection] {
        &[Projection::ByEntity, Projection::ByDate]
    }

    fn lookback(&self) -> usize {
        self.config.std_window.max(self.config.corr_window)
    }

    fn compute_scores(&self, data: LazyFrame) -> Result<LazyFrame> {
        Ok(intraday_dispersion(data, &self.config, self.name()))
    }
}

impl ConfigurableFactor for IntradayDispersionFactor {
    type Config = IntradayDispersionConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

/// Five-day intraday dispersion
#[derive(Debug)]
pub struct ShortIntradayDispersionFactor {
    config: IntradayDispersionConfig,
}

impl Default for ShortIntradayDispersionFactor {
    fn default() -> Self {
        Self::with_config(IntradayDispersionConfig {
            std_window: 5,
            corr_window: 10,
        })
    }
}

impl Factor for ShortIntradayDispersionFactor {
    fn name(&self) -> &'static str {
        "alpha11"
    }

    fn description(&self) -> &'static str {
        "Negated rank of 5-day body dispersion plus body plus close/open correlation"
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Volatility
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[DATE, SYMBOL, OPEN, CLOSE]
    }

    fn projections(&self) -> &'static [Projection] {
        &[Projection::ByEntity, Projection::ByDate]
    }

    fn lookback(&self) -> usize {
        self.config.std_window.max(self.config.corr_window)
    }

    fn compute_scores(&self, data: LazyFrame) -> Result<LazyFrame> {
        Ok(intraday_dispersion(data, &self.config, self.name()))
    }
}

impl ConfigurableFactor for ShortIntradayDispersionFactor {
    type Config = IntradayDispersionConfig;

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
    fn test_dispersion_is_negated_rank() {
        let config = IntradayDispersionConfig {
            std_window: 2,
            corr_window: 2,
        };
        let data = df![
            "symbol" => ["A", "A", "B", "B"],
            "date" => ["d1", "d2", "d1", "d2"],
            "open" => [10.0, 10.0, 20.0, 20.0],
            "close" => [11.0, 12.0, 19.0, 22.0]
        ]
        .unwrap();

        let out = intraday_dispersion(data.lazy(), &config, "disp")
            .collect()
            .unwrap();
        let values: Vec<Option<f64>> = out
            .column("disp")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect();

        // Open is constant, so the close/open correlation is undefined and
        // the whole score with it.
        assert!(values.iter().all(Option::is_none));

        let data = df![
            "symbol" => ["A", "A", "B", "B"],
            "date" => ["d1", "d2", "d1", "d2"],
            "open" => [10.0, 11.0, 20.0, 21.0],
            "close" => [11.0, 13.0, 19.0, 22.0]
        ]
        .unwrap();
        let out = intraday_dispersion(data.lazy(), &config, "disp")
            .collect()
            .unwrap();
        let values: Vec<Option<f64>> = out
            .column("disp")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect();

        // d2: A has body 2 and |body| history [1, 2], B has body 1 and
        // |body| history [1, 1]; both correlations are +1, so A ranks higher.
        assert_eq!(values[0], None);
        assert_eq!(values[2], None);
        assert_relative_eq!(values[1].unwrap(), -1.0);
        assert_relative_eq!(values[3].unwrap(), -0.5);
    }
}
