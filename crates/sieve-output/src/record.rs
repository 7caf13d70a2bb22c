//! Flat result records.

use serde::{Deserialize, Serialize};
use sieve_eval::{BacktestResult, FactorOutcome};
use sieve_select::FactorImportance;

/// Factor name of the composite row written by a multi-factor run.
pub const MULTIFACTOR: &str = "multifactor";

/// One factor's backtest statistics.
///
/// Column names follow the results files: `ann_l`, `ann_ls`, `sharpe_l`,
/// `sharpe_ls`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Factor name
    pub factor: String,
    /// Mean daily rank IC
    pub ic_mean: f64,
    /// Standard deviation of the daily rank IC
    pub ic_std: f64,
    /// IC information ratio
    pub ic_ir: f64,
    /// Annualized long return
    #[serde(rename = "ann_l")]
    pub annualized_long_return: f64,
    /// Annualized long-short return
    #[serde(rename = "ann_ls")]
    pub annualized_long_short_return: f64,
    /// Long Sharpe ratio
    #[serde(rename = "sharpe_l")]
    pub sharpe_long: f64,
    /// Long-short Sharpe ratio
    #[serde(rename = "sharpe_ls")]
    pub sharpe_long_short: f64,
}

impl ResultRow {
    /// Attach a factor name to a backtest result.
    pub fn new(factor: impl Into<String>, result: &BacktestResult) -> Self {
        Self {
            factor: factor.into(),
            ic_mean: result.ic_mean,
            ic_std: result.ic_std,
            ic_ir: result.ic_ir,
            annualized_long_return: result.annualized_long_return,
            annualized_long_short_return: result.annualized_long_short_return,
            sharpe_long: result.sharpe_long,
            sharpe_long_short: result.sharpe_long_short,
        }
    }

    /// Row of a successful batch outcome, `None` for a failed one.
    pub fn from_outcome(outcome: &FactorOutcome) -> Option<Self> {
        outcome
            .result
            .as_ref()
            .ok()
            .map(|result| Self::new(outcome.factor.as_str(), result))
    }
}

/// One factor's importance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportanceRow {
    /// Factor name
    pub factor: String,
    /// Importance score
    pub importance: f64,
}

impl From<&FactorImportance> for ImportanceRow {
    fn from(value: &FactorImportance) -> Self {
        Self {
            factor: value.factor.clone(),
            importance: value.importance,
        }
    }
}
