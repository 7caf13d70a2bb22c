//! Date and entity projections of a panel.
//!
//! A panel is indexed twice: by date (a cross-section of symbols) and by
//! symbol (an ordered history of dates). Every derived signal is built from
//! one of the two builders in this module:
//!
//! - [`ByEntity`] partitions each expression by `symbol`. Rows must be sorted
//!   by (symbol, date), which [`Panel`](crate::Panel) guarantees, so rolling
//!   windows and lags only see the same symbol's past rows.
//! - [`ByDate`] partitions each expression by `date`, so ranks and
//!   standardization only see the same day's cross-section.
//!
//! Window expressions are not nested: a cross-sectional step must consume a
//! column materialized by a previous `with_columns` stage, and vice versa.
//!
//! Division faults are handled where they occur. [`ratio`] yields null for a
//! zero denominator and [`defined`] maps NaN and infinities to null.

use std::collections::BTreeMap;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::schema::{DATE, SYMBOL};

/// Which projection of the panel a transform reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Projection {
    /// Per-symbol history (rolling windows, lags, differences)
    ByEntity,
    /// Per-date cross-section (ranks, z-scores)
    ByDate,
}

impl std::fmt::Display for Projection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ByEntity => write!(f, "time-series"),
            Self::ByDate => write!(f, "cross-sectional"),
        }
    }
}

/// Typed null literal for float columns.
pub fn null_f64() -> Expr {
    lit(NULL).cast(DataType::Float64)
}

/// Keep finite values, turn NaN and infinities into null.
pub fn defined(expr: Expr) -> Expr {
    when(expr.clone().is_finite())
        .then(expr)
        .otherwise(null_f64())
}

/// `numerator / denominator`, null where the denominator is zero.
pub fn ratio(numerator: Expr, denominator: Expr) -> Expr {
    defined(
        when(denominator.clone().neq(lit(0.0)))
            .then(numerator / denominator)
            .otherwise(null_f64()),
    )
}

/// Absolute value as a conditional, which keeps the `abs` feature out of polars.
pub fn abs(expr: Expr) -> Expr {
    when(expr.clone().lt(lit(0.0)))
        .then(-expr.clone())
        .otherwise(expr)
}

/// Element-wise sign: -1, 0 or 1, null stays null.
pub fn sign(expr: Expr) -> Expr {
    when(expr.clone().gt(lit(0.0)))
        .then(lit(1.0))
        .when(expr.clone().lt(lit(0.0)))
        .then(lit(-1.0))
        .when(expr.eq(lit(0.0)))
        .then(lit(0.0))
        .otherwise(null_f64())
}

fn full_window(window: usize) -> RollingOptionsFixedWindow {
    RollingOptionsFixedWindow {
        window_size: window,
        min_periods: window,
        ..Default::default()
    }
}

/// Time-series transforms, each evaluated within one symbol's history.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByEntity;

impl ByEntity {
    fn over(expr: Expr) -> Expr {
        expr.over([col(SYMBOL)])
    }

    /// Value `periods` rows earlier in the same symbol's history.
    pub fn lag(expr: Expr, periods: i64) -> Expr {
        Self::over(expr.shift(lit(periods)))
    }

    /// `x_t - x_{t-periods}` within a symbol.
    pub fn diff(expr: Expr, periods: i64) -> Expr {
        expr.clone() - Self::lag(expr, periods)
    }

    /// Rolling mean over a full window of `window` rows.
    pub fn rolling_mean(expr: Expr, window: usize) -> Expr {
        defined(Self::over(expr.rolling_mean(full_window(window))))
    }

    /// Rolling sample standard deviation over a full window of `window` rows.
    pub fn rolling_std(expr: Expr, window: usize) -> Expr {
        defined(Self::over(expr.rolling_std(full_window(window))))
    }

    /// Rolling Pearson correlation of two columns over a full window.
    ///
    /// Windows where either side has zero variance are null. Zero variance
    /// is tested as max == min, not on the rolling variance, which keeps a
    /// rounding residue for constants such as 0.1.
    pub fn rolling_corr(x: Expr, y: Expr, window: usize) -> Expr {
        let options = RollingCovOptions {
            window_size: window as IdxSize,
            min_periods: window as IdxSize,
            ddof: 1,
        };
        let varies = Self::rolling_varies(x.clone(), window)
            .and(Self::rolling_varies(y.clone(), window));
        when(varies)
            .then(defined(Self::over(rolling_corr(x, y, options))))
            .otherwise(null_f64())
    }

    /// True where a full window holds at least two distinct values.
    fn rolling_varies(expr: Expr, window: usize) -> Expr {
        let max = Self::over(expr.clone().rolling_max(full_window(window)));
        let min = Self::over(expr.rolling_min(full_window(window)));
        max.gt(min)
    }

    /// Row indices of every symbol, in row order.
    ///
    /// This is the eager form of the projection, used by consumers that
    /// iterate symbols rather than build expressions.
    pub fn groups(frame: &DataFrame) -> Result<Vec<(String, Vec<usize>)>> {
        key_groups(frame, SYMBOL)
    }
}

/// Cross-sectional transforms, each evaluated within one date.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByDate;

impl ByDate {
    fn over(expr: Expr) -> Expr {
        expr.over([col(DATE)])
    }

    /// Cross-sectional mean.
    pub fn mean(expr: Expr) -> Expr {
        Self::over(expr.mean())
    }

    /// Cross-sectional sample standard deviation.
    pub fn std(expr: Expr) -> Expr {
        Self::over(expr.std(1))
    }

    /// Percentile rank within the date: average rank of ties divided by the
    /// number of defined values. Nulls keep a null rank.
    pub fn pct_rank(expr: Expr) -> Expr {
        let rank = expr
            .clone()
            .rank(
                RankOptions {
                    method: RankMethod::Average,
                    descending: false,
                },
                None,
            )
            .cast(DataType::Float64);
        let count = expr.count().cast(DataType::Float64);
        Self::over(rank / count)
    }

    /// Cross-sectional z-score `(x - mean) / std`; null when the date's
    /// standard deviation is zero or undefined.
    pub fn zscore(expr: Expr) -> Expr {
        let mean = Self::mean(expr.clone());
        let std = Self::std(expr.clone());
        defined(
            when(std.clone().gt(lit(0.0)))
                .then((expr - mean) / std)
                .otherwise(null_f64()),
        )
    }

    /// Row indices of every date, ascending by date.
    pub fn groups(frame: &DataFrame) -> Result<Vec<(String, Vec<usize>)>> {
        key_groups(frame, DATE)
    }
}

fn key_groups(frame: &DataFrame, key: &str) -> Result<Vec<(String, Vec<usize>)>> {
    let keys = frame.column(key)?.cast(&DataType::String)?;
    let keys = keys.as_materialized_series().str()?;

    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (row, value) in keys.into_iter().enumerate() {
        if let Some(value) = value {
            groups.entry(value.to_string()).or_default().push(row);
        }
    }
    Ok(groups.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> DataFrame {
        df![
            "symbol" => ["A", "A", "A", "B", "B", "B"],
            "date" => ["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-01", "2024-01-02", "2024-01-03"],
            "x" => [1.0, 2.0, 3.0, 10.0, 20.0, 30.0],
            "y" => [2.0, 0.0, 6.0, 5.0, 5.0, 5.0]
        ]
        .unwrap()
    }

    fn values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn test_lag_stays_within_symbol() {
        let out = sample()
            .lazy()
            .with_columns([ByEntity::lag(col("x"), 1).alias("lagged")])
            .collect()
            .unwrap();

        assert_eq!(
            values(&out, "lagged"),
            vec![None, Some(1.0), Some(2.0), None, Some(10.0), Some(20.0)]
        );
    }

    #[test]
    fn test_rolling_mean_requires_full_window() {
        let out = sample()
            .lazy()
            .with_columns([ByEntity::rolling_mean(col("x"), 2).alias("mean")])
            .collect()
            .unwrap();

        assert_eq!(
            values(&out, "mean"),
            vec![None, Some(1.5), Some(2.5), None, Some(15.0), Some(25.0)]
        );
    }

    #[test]
    fn test_ratio_zero_denominator_is_null() {
        let out = sample()
            .lazy()
            .with_columns([ratio(col("x"), col("y")).alias("r")])
            .collect()
            .unwrap();

        let r = values(&out, "r");
        assert_eq!(r[1], None);
        assert_relative_eq!(r[0].unwrap(), 0.5);
    }

    #[test]
    fn test_pct_rank_within_date() {
        let out = sample()
            .lazy()
            .with_columns([ByDate::pct_rank(col("x")).alias("rank")])
            .collect()
            .unwrap();

        // Each date has two symbols, A below B.
        assert_eq!(
            values(&out, "rank"),
            vec![Some(0.5), Some(0.5), Some(0.5), Some(1.0), Some(1.0), Some(1.0)]
        );
    }

    #[test]
    fn test_zscore_zero_std_is_null() {
        let df = df![
            "symbol" => ["A", "B", "A", "B"],
            "date" => ["d1", "d1", "d2", "d2"],
            "x" => [1.0, 3.0, 4.0, 4.0]
        ]
        .unwrap();
        let out = df
            .lazy()
            .with_columns([ByDate::zscore(col("x")).alias("z")])
            .collect()
            .unwrap();

        let z = values(&out, "z");
        assert_relative_eq!(z[0].unwrap(), -std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(z[1].unwrap(), std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_eq!(z[2], None);
        assert_eq!(z[3], None);
    }

    fn flat_open() -> DataFrame {
        df![
            "symbol" => ["A"; 12],
            "date" => (1..=12).map(|d| format!("2024-01-{d:02}")).collect::<Vec<_>>(),
            "open" => [0.1; 12],
            "close" => [10.37; 12],
            "volume" => [5.0, 9.0, 2.0, 7.0, 4.0, 8.0, 1.0, 6.0, 3.0, 11.0, 12.0, 10.0]
        ]
        .unwrap()
    }

    #[test]
    fn test_rolling_corr_constant_window_is_null() {
        let out = flat_open()
            .lazy()
            .with_columns([
                ByEntity::rolling_corr(col("open"), col("volume"), 10).alias("open_corr"),
                ByEntity::rolling_corr(col("volume"), col("close"), 10).alias("close_corr"),
            ])
            .collect()
            .unwrap();

        assert!(values(&out, "open_corr").iter().all(Option::is_none));
        assert!(values(&out, "close_corr").iter().all(Option::is_none));
    }

    #[test]
    fn test_rolling_corr_varying_windows() {
        let df = df![
            "symbol" => ["A", "A", "A", "A", "B", "B", "B", "B"],
            "date" => ["d1", "d2", "d3", "d4", "d1", "d2", "d3", "d4"],
            "x" => [0.1, 0.2, 0.3, 0.3, 1.0, 2.0, 3.0, 4.0],
            "y" => [1.0, 2.0, 3.0, 3.0, 8.0, 6.0, 4.0, 2.0]
        ]
        .unwrap();
        let out = df
            .lazy()
            .with_columns([ByEntity::rolling_corr(col("x"), col("y"), 3).alias("c")])
            .collect()
            .unwrap();

        let c = values(&out, "c");
        assert_eq!(c[..2], [None, None]);
        assert_relative_eq!(c[2].unwrap(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(c[3].unwrap(), 1.0, epsilon = 1e-9);
        assert_eq!(c[4..6], [None, None]);
        assert_relative_eq!(c[6].unwrap(), -1.0, epsilon = 1e-9);
        assert_relative_eq!(c[7].unwrap(), -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sign() {
        let df = df!["v" => [Some(-2.0), Some(0.0), Some(3.5), None]].unwrap();
        let out = df
            .lazy()
            .with_columns([sign(col("v")).alias("s")])
            .collect()
            .unwrap();
        assert_eq!(
            values(&out, "s"),
            vec![Some(-1.0), Some(0.0), Some(1.0), None]
        );
    }

    #[test]
    fn test_date_groups_sorted() {
        let groups = ByDate::groups(&sample()).unwrap();
        let keys: Vec<&str> = groups.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
        assert_eq!(groups[0].1, vec![0, 3]);
    }
}
