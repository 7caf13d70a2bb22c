//! Quantile-bucket backtest of one factor against the label.
//!
//! For every date the defined (factor, label) pairs are bucketed by factor
//! value. The top bucket's mean label is the long return, the top minus the
//! bottom bucket's mean label the long-short return, and the Spearman
//! correlation of factor and label the daily IC. The daily series are then
//! compounded, annualized and averaged.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use sieve_panel::{ByDate, DATE, SYMBOL};
use tracing::debug;

use crate::bucket::assign_buckets;
use crate::ic::spearman;
use crate::stats::{annualized_return, information_ratio, mean, sample_std, sharpe_ratio};
use crate::{BacktestError, Result};

const FACTOR_KEY: &str = "__factor";
const LABEL_KEY: &str = "__label";

/// Backtest configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    /// Number of equal-frequency buckets per date
    pub n_buckets: usize,
    /// Periods per year used to annualize returns and Sharpe ratios
    pub trading_days_per_year: usize,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            n_buckets: 5,
            trading_days_per_year: 252,
        }
    }
}

/// Summary statistics of one factor's backtest.
///
/// Undefined statistics are NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Mean daily rank IC
    pub ic_mean: f64,
    /// Sample standard deviation of the daily rank IC
    pub ic_std: f64,
    /// `ic_mean / ic_std`
    pub ic_ir: f64,
    /// Annualized compounded return of the top bucket
    pub annualized_long_return: f64,
    /// Annualized compounded return of top minus bottom bucket
    pub annualized_long_short_return: f64,
    /// Annualized Sharpe ratio of the top bucket
    pub sharpe_long: f64,
    /// Annualized Sharpe ratio of top minus bottom bucket
    pub sharpe_long_short: f64,
}

/// Per-date statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Date key in its text form
    pub date: String,
    /// Symbols with both a defined factor and a defined label
    pub n_entities: usize,
    /// Effective bucket count
    pub n_buckets: usize,
    /// Mean label of the top bucket
    pub long_return: f64,
    /// Top bucket minus bottom bucket mean label
    pub long_short_return: f64,
    /// Spearman correlation of factor and label; NaN when undefined
    pub ic: f64,
}

/// A result together with the daily series it was aggregated from.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailedBacktest {
    /// Aggregate statistics
    pub result: BacktestResult,
    /// One record per date with at least one usable symbol, ascending by date
    pub daily: Vec<DailyRecord>,
}

/// Backtesting engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct Backtest {
    config: BacktestConfig,
}

impl Backtest {
    /// Create a backtest with the given configuration.
    pub const fn new(config: BacktestConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    pub const fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Evaluate `factor_col` of `factors` against `label_col` of `labels`.
    ///
    /// The two frames are inner-joined on (date, symbol).
    ///
    /// # Errors
    ///
    /// - [`BacktestError::NoOverlap`] when the join is empty
    /// - [`BacktestError::MissingField`] when a column is absent
    pub fn evaluate(
        &self,
        factors: &DataFrame,
        factor_col: &str,
        labels: &DataFrame,
        label_col: &str,
    ) -> Result<BacktestResult> {
        Ok(self
            .evaluate_detailed(factors, factor_col, labels, label_col)?
            .result)
    }

    /// Evaluate a factor column against a label column of the same frame.
    pub fn evaluate_column(
        &self,
        table: &DataFrame,
        factor_col: &str,
        label_col: &str,
    ) -> Result<BacktestResult> {
        self.evaluate(table, factor_col, table, label_col)
    }

    /// Like [`Backtest::evaluate`], also returning the daily records.
    pub fn evaluate_detailed(
        &self,
        factors: &DataFrame,
        factor_col: &str,
        labels: &DataFrame,
        label_col: &str,
    ) -> Result<DetailedBacktest> {
        if self.config.n_buckets == 0 {
            return Err(BacktestError::InvalidBuckets(0));
        }
        let joined = align(factors, factor_col, labels, label_col)?;
        if joined.height() == 0 {
            return Err(BacktestError::NoOverlap {
                factor: factor_col.to_string(),
            });
        }

        let factor = float_column(&joined, FACTOR_KEY)?;
        let label = float_column(&joined, LABEL_KEY)?;

        let mut daily = Vec::new();
        for (date, rows) in ByDate::groups(&joined)? {
            let (x, y): (Vec<f64>, Vec<f64>) = rows
                .iter()
                .filter_map(|row| match (factor[*row], label[*row]) {
                    (Some(f), Some(l)) if f.is_finite() && l.is_finite() => Some((f, l)),
                    _ => None,
                })
                .unzip();
            if let Some(record) = self.score_date(date, &x, &y) {
                daily.push(record);
            }
        }

        let result = self.aggregate(&daily);
        debug!(
            factor = factor_col,
            dates = daily.len(),
            ic_mean = result.ic_mean,
            "evaluated factor"
        );
        Ok(DetailedBacktest { result, daily })
    }

    fn score_date(&self, date: String, factor: &[f64], label: &[f64]) -> Option<DailyRecord> {
        let buckets = assign_buckets(factor, self.config.n_buckets);
        if buckets.count == 0 {
            return None;
        }
        let top = buckets.count - 1;
        let bucket_mean = |bucket: usize| {
            let members: Vec<f64> = buckets
                .assignment
                .iter()
                .zip(label)
                .filter(|(b, _)| **b == bucket)
                .map(|(_, l)| *l)
                .collect();
            members.iter().sum::<f64>() / members.len() as f64
        };

        let long_return = bucket_mean(top);
        let short_return = bucket_mean(0);
        Some(DailyRecord {
            date,
            n_entities: factor.len(),
            n_buckets: buckets.count,
            long_return,
            long_short_return: long_return - short_return,
            ic: spearman(factor, label).unwrap_or(f64::NAN),
        })
    }

    fn aggregate(&self, daily: &[DailyRecord]) -> BacktestResult {
        let days = self.config.trading_days_per_year;
        let long: Vec<f64> = daily.iter().map(|d| d.long_return).collect();
        let long_short: Vec<f64> = daily.iter().map(|d| d.long_short_return).collect();
        let ic: Vec<f64> = daily.iter().map(|d| d.ic).collect();

        let ic_mean = mean(&ic);
        let ic_std = sample_std(&ic);
        BacktestResult {
            ic_mean,
            ic_std,
            ic_ir: information_ratio(ic_mean, ic_std),
            annualized_long_return: annualized_return(&long, days),
            annualized_long_short_return: annualized_return(&long_short, days),
            sharpe_long: sharpe_ratio(&long, days),
            sharpe_long_short: sharpe_ratio(&long_short, days),
        }
    }
}

/// Evaluate with the default configuration and the given bucket count.
pub fn evaluate(
    factors: &DataFrame,
    factor_col: &str,
    labels: &DataFrame,
    label_col: &str,
    n_buckets: usize,
) -> Result<BacktestResult> {
    Backtest::new(BacktestConfig {
        n_buckets,
        ..Default::default()
    })
    .evaluate(factors, factor_col, labels, label_col)
}

fn require(frame: &DataFrame, field: &str) -> Result<()> {
    if frame.column(field).is_err() {
        return Err(BacktestError::MissingField {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn align(
    factors: &DataFrame,
    factor_col: &str,
    labels: &DataFrame,
    label_col: &str,
) -> Result<DataFrame> {
    for (frame, field) in [(factors, factor_col), (labels, label_col)] {
        for column in [DATE, SYMBOL, field] {
            require(frame, column)?;
        }
    }

    let left = factors.clone().lazy().select([
        col(DATE),
        col(SYMBOL),
        col(factor_col).cast(DataType::Float64).alias(FACTOR_KEY),
    ]);
    let right = labels.clone().lazy().select([
        col(DATE),
        col(SYMBOL),
        col(label_col).cast(DataType::Float64).alias(LABEL_KEY),
    ]);
    let keys = [col(DATE), col(SYMBOL)];
    Ok(left
        .join(right, keys.clone(), keys, JoinArgs::new(JoinType::Inner))
        .collect()?)
}

fn float_column(frame: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    Ok(frame
        .column(name)?
        .as_materialized_series()
        .f64()?
        .into_iter()
        .collect())
}
