//! The validated (date, symbol) panel.

use chrono::{Days, NaiveDate};
use polars::prelude::*;
use tracing::debug;

use crate::projection::{defined, null_f64};
use crate::schema::{AMOUNT, DATE, INDEX, RAW_FIELDS, SYMBOL, VOLUME, VWAP};
use crate::{PanelError, Result};

/// A table of observations keyed by (date, symbol).
///
/// Construction validates the schema and the index, casts the raw fields to
/// `f64`, derives `vwap` when it is absent and sorts rows by (symbol, date)
/// so that per-symbol windows run in date order.
#[derive(Debug, Clone)]
pub struct Panel {
    frame: DataFrame,
}

impl Panel {
    /// Validate and normalize a raw frame.
    ///
    /// # Errors
    ///
    /// - [`PanelError::MissingField`] if an index column or raw field is absent
    /// - [`PanelError::DuplicateIndex`] if a (date, symbol) pair repeats
    pub fn new(frame: DataFrame) -> Result<Self> {
        for field in INDEX.iter().chain(RAW_FIELDS.iter()) {
            require_column(&frame, field)?;
        }

        let duplicates = duplicate_index_count(&frame)?;
        if duplicates > 0 {
            return Err(PanelError::DuplicateIndex { count: duplicates });
        }

        let has_vwap = frame.column(VWAP).is_ok();
        let mut casts: Vec<Expr> = RAW_FIELDS
            .iter()
            .map(|field| col(*field).cast(DataType::Float64))
            .collect();
        if has_vwap {
            casts.push(col(VWAP).cast(DataType::Float64));
        }

        let mut lazy = frame
            .lazy()
            .with_columns(casts)
            .sort([SYMBOL, DATE], Default::default());
        if !has_vwap {
            lazy = lazy.with_columns([vwap_expr().alias(VWAP)]);
        }
        let frame = lazy.collect()?;

        debug!(rows = frame.height(), "validated panel");
        Ok(Self { frame })
    }

    /// The underlying frame, sorted by (symbol, date).
    pub const fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Consume the panel, returning the frame.
    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Lazy view of the panel for expression pipelines.
    pub fn lazy(&self) -> LazyFrame {
        self.frame.clone().lazy()
    }

    /// Number of observations.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Whether the panel carries no observations.
    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Number of distinct dates.
    pub fn n_dates(&self) -> Result<usize> {
        Ok(self.frame.column(DATE)?.as_materialized_series().n_unique()?)
    }

    /// Number of distinct symbols.
    pub fn n_symbols(&self) -> Result<usize> {
        Ok(self.frame.column(SYMBOL)?.as_materialized_series().n_unique()?)
    }

    /// Whether a column is present.
    pub fn has_field(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }

    /// Check that every named column is present.
    ///
    /// # Errors
    ///
    /// [`PanelError::MissingField`] naming the first absent column.
    pub fn require(&self, fields: &[&str]) -> Result<()> {
        fields
            .iter()
            .try_for_each(|field| require_column(&self.frame, field))
    }

    /// The `[date, symbol]` index frame in panel order.
    pub fn index(&self) -> Result<DataFrame> {
        Ok(self.frame.select(INDEX)?)
    }

    /// Keep only the index, the raw fields and `vwap`.
    pub fn select_fields(&self) -> Result<Self> {
        let columns: Vec<&str> = INDEX
            .iter()
            .chain(RAW_FIELDS.iter())
            .chain(std::iter::once(&VWAP))
            .copied()
            .collect();
        Ok(Self {
            frame: self.frame.select(columns)?,
        })
    }

    /// Observations with `start <= date <= end`.
    ///
    /// Dates are compared on their ISO text form, so `date` may be a string,
    /// a date or a datetime column.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(PanelError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        let upper = end
            .checked_add_days(Days::new(1))
            .ok_or_else(|| PanelError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            })?;

        let key = col(DATE).cast(DataType::String);
        let frame = self
            .lazy()
            .filter(
                key.clone()
                    .gt_eq(lit(start.format("%Y-%m-%d").to_string()))
                    .and(key.lt(lit(upper.format("%Y-%m-%d").to_string()))),
            )
            .collect()?;
        Ok(Self { frame })
    }
}

/// `amount / volume`, with zero for a zero volume and for any undefined result.
pub fn vwap_expr() -> Expr {
    defined(
        when(col(VOLUME).neq(lit(0.0)))
            .then(col(AMOUNT).cast(DataType::Float64) / col(VOLUME).cast(DataType::Float64))
            .otherwise(null_f64()),
    )
    .fill_null(lit(0.0))
}

fn require_column(frame: &DataFrame, field: &str) -> Result<()> {
    if frame.column(field).is_err() {
        return Err(PanelError::MissingField {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn duplicate_index_count(frame: &DataFrame) -> Result<usize> {
    let duplicated = frame
        .clone()
        .lazy()
        .group_by([col(DATE), col(SYMBOL)])
        .agg([len().alias("n")])
        .filter(col("n").gt(lit(1)))
        .collect()?;
    Ok(duplicated.height())
}
