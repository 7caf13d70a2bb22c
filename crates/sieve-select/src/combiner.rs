//! Composite scores from selected factors.

use polars::prelude::*;
use sieve_panel::{ByDate, DATE, SYMBOL, null_f64};
use tracing::debug;

use crate::{Result, SelectError};

/// Column holding the composite score.
pub const COMPOSITE: &str = "composite";

/// Average the per-date z-scores of `selected` factor columns.
///
/// Returns `date`, `symbol` and [`COMPOSITE`] in the row order of `table`.
/// A z-score is undefined where the date's standard deviation is zero or the
/// value is missing; undefined z-scores are left out of the average, and the
/// composite is null when none of the factors is defined.
pub fn combine(table: &DataFrame, selected: &[String]) -> Result<DataFrame> {
    if selected.is_empty() {
        return Err(SelectError::EmptySelection);
    }
    for factor in selected {
        if table.column(factor).is_err() {
            return Err(SelectError::UnknownFactor(factor.clone()));
        }
    }

    let scored: Vec<String> = selected.iter().map(|f| format!("__z_{f}")).collect();
    let zscores: Vec<Expr> = selected
        .iter()
        .zip(&scored)
        .map(|(factor, z)| {
            ByDate::zscore(col(factor.as_str()).cast(DataType::Float64)).alias(z.as_str())
        })
        .collect();

    let total = scored
        .iter()
        .map(|z| col(z.as_str()).fill_null(lit(0.0)))
        .reduce(|acc, expr| acc + expr)
        .unwrap_or_else(|| lit(0.0));
    let count = scored
        .iter()
        .map(|z| col(z.as_str()).is_not_null().cast(DataType::Float64))
        .reduce(|acc, expr| acc + expr)
        .unwrap_or_else(|| lit(0.0));

    let composite = table
        .clone()
        .lazy()
        .with_columns(zscores)
        .select([
            col(DATE),
            col(SYMBOL),
            when(count.clone().gt(lit(0.0)))
                .then(total / count)
                .otherwise(null_f64())
                .alias(COMPOSITE),
        ])
        .collect()?;

    debug!(factors = selected.len(), rows = composite.height(), "combined factors");
    Ok(composite)
}
