//! Wide factor tables.
//!
//! A factor table has one row per (date, symbol) and the columns
//! `date`, `symbol`, one column per factor and `label`. Rows holding any
//! undefined value are dropped when the table is built.

use std::path::Path;

use polars::prelude::*;
use sieve_panel::{DATE, LABEL, Panel, SYMBOL, read_frame, write_frame};
use tracing::{debug, info, warn};

use crate::{FactorError, FactorRegistry, Result};

/// Aligned factor values and labels.
#[derive(Debug, Clone)]
pub struct FactorTable {
    frame: DataFrame,
}

impl FactorTable {
    /// Wrap a frame that carries the index and label columns.
    ///
    /// # Errors
    ///
    /// [`FactorError::MissingField`] if `date`, `symbol` or `label` is absent.
    pub fn new(frame: DataFrame) -> Result<Self> {
        for field in [DATE, SYMBOL, LABEL] {
            if frame.column(field).is_err() {
                return Err(FactorError::MissingField {
                    field: field.to_string(),
                });
            }
        }
        Ok(Self { frame })
    }

    /// Load a table written by [`FactorTable::write`].
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(read_frame(path)?)
    }

    /// Persist the table as parquet or CSV, chosen by extension.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut frame = self.frame.clone();
        write_frame(&mut frame, path)?;
        Ok(())
    }

    /// The underlying frame.
    pub const fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Consume the table, returning the frame.
    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Names of the factor columns, in column order.
    pub fn factor_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .filter(|name| ![DATE, SYMBOL, LABEL].contains(&name.as_str()))
            .collect()
    }

    /// Whether a factor column is present.
    pub fn has_factor(&self, name: &str) -> bool {
        self.factor_names().iter().any(|factor| factor == name)
    }
}

/// Compute every registered factor over the panel and assemble the table.
///
/// Rows where any factor or the label is undefined are dropped, and the
/// number of dropped rows is logged.
pub fn build_factor_table(panel: &Panel, registry: &FactorRegistry) -> Result<FactorTable> {
    let mut frame = panel.frame().select([DATE, SYMBOL])?;
    let mut columns = Vec::with_capacity(registry.len() + 1);

    for factor in registry.iter() {
        let scores = factor.compute(panel)?;
        frame.with_column(scores.column(factor.name())?.clone())?;
        columns.push(factor.name().to_string());
    }
    frame.with_column(panel.frame().column(LABEL)?.clone())?;
    columns.push(LABEL.to_string());

    let before = frame.height();
    let complete = columns
        .iter()
        .map(|name| col(name.as_str()).is_finite())
        .reduce(|acc, expr| acc.and(expr))
        .unwrap_or_else(|| lit(true));
    let frame = frame
        .lazy()
        .filter(complete)
        .sort([DATE, SYMBOL], Default::default())
        .collect()?;

    let dropped = before - frame.height();
    if dropped > 0 {
        warn!(dropped, kept = frame.height(), "dropped rows with undefined factor values");
    }
    debug!(factors = registry.len(), "assembled factor columns");
    info!(rows = frame.height(), factors = registry.len(), "built factor table");

    FactorTable::new(frame)
}
