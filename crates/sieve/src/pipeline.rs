//! End-to-end pipeline stages.
//!
//! 1. [`load_panel`]: read a raw file, rename its keys and validate it
//! 2. [`split`]: train and test panels by date range
//! 3. [`build`]: factor table of a panel
//! 4. [`run_single_factor`]: backtest every factor column of a table
//! 5. [`run_multi_factor`]: select on the train table, combine and backtest
//!    the composite on the test table

use std::path::Path;

use polars::prelude::*;
use sieve_eval::{Backtest, BacktestConfig, FactorOutcome};
use sieve_factors::{FactorRegistry, FactorTable, build_factor_table};
use sieve_output::{ImportanceRow, MULTIFACTOR, ResultRow};
use sieve_panel::{DATE, LABEL, Panel, SYMBOL, read_frame, rename_keys};
use sieve_select::{COMPOSITE, SelectConfig, Selection, Selector, combine};
use tracing::info;

use crate::Result;
use crate::config::{SourceConfig, SplitConfig};

/// Read a panel file and keep only the raw fields.
///
/// Source key columns are renamed to `date` and `symbol` unless the file
/// already carries both.
pub fn load_panel(path: impl AsRef<Path>, source: &SourceConfig) -> Result<Panel> {
    let path = path.as_ref();
    let mut frame = read_frame(path)?;
    if frame.column(DATE).is_err() || frame.column(SYMBOL).is_err() {
        frame = rename_keys(frame, &source.date_column, &source.symbol_column)?;
    }
    let panel = Panel::new(frame)?.select_fields()?;
    info!(
        path = %path.display(),
        rows = panel.height(),
        symbols = panel.n_symbols()?,
        dates = panel.n_dates()?,
        "loaded panel"
    );
    Ok(panel)
}

/// Cut a panel into its train and test ranges.
pub fn split(panel: &Panel, ranges: &SplitConfig) -> Result<(Panel, Panel)> {
    let train = panel.between(ranges.train_start, ranges.train_end)?;
    let test = panel.between(ranges.test_start, ranges.test_end)?;
    info!(
        train_rows = train.height(),
        test_rows = test.height(),
        "split panel"
    );
    Ok((train, test))
}

/// Factor table of `panel` over the listed factors, or all when empty.
pub fn build(panel: &Panel, factors: &[String]) -> Result<FactorTable> {
    let mut registry = FactorRegistry::standard();
    if !factors.is_empty() {
        let names: Vec<&str> = factors.iter().map(String::as_str).collect();
        registry = registry.retain(&names)?;
    }
    Ok(build_factor_table(panel, &registry)?)
}

/// Outcome of a batch single-factor run.
#[derive(Debug)]
pub struct SingleFactorRun {
    /// One row per successfully evaluated factor, in table column order
    pub rows: Vec<ResultRow>,
    /// Factors that failed, with the reason
    pub failures: Vec<(String, String)>,
}

/// Backtest every factor column of `table`.
///
/// `on_done` is called as each factor finishes; a failing factor is
/// recorded in [`SingleFactorRun::failures`] and the rest still run.
pub fn run_single_factor<F>(
    table: &FactorTable,
    config: &BacktestConfig,
    on_done: F,
) -> SingleFactorRun
where
    F: Fn(&FactorOutcome) + Sync,
{
    let factors = table.factor_names();
    let outcomes = Backtest::new(*config).evaluate_all_with(table.frame(), &factors, LABEL, on_done);

    let mut rows = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for outcome in &outcomes {
        match &outcome.result {
            Ok(result) => rows.push(ResultRow::new(outcome.factor.as_str(), result)),
            Err(err) => failures.push((outcome.factor.clone(), err.to_string())),
        }
    }
    info!(
        evaluated = rows.len(),
        failed = failures.len(),
        "single-factor run finished"
    );
    SingleFactorRun { rows, failures }
}

/// Outcome of a multi-factor run.
#[derive(Debug)]
pub struct MultiFactorRun {
    /// Selection fitted on the train table
    pub selection: Selection,
    /// Importance ranking, most important first
    pub importance: Vec<ImportanceRow>,
    /// Backtest of the composite on the test table, named [`MULTIFACTOR`]
    pub result: ResultRow,
    /// Composite score per test (date, symbol)
    pub composite: DataFrame,
}

/// Select factors on `train`, combine them on `test` and backtest the
/// composite against the test labels.
pub fn run_multi_factor(
    train: &FactorTable,
    test: &FactorTable,
    select: &SelectConfig,
    backtest: &BacktestConfig,
) -> Result<MultiFactorRun> {
    let selection = Selector::new(select.clone()).select(train)?;
    let composite = combine(test.frame(), &selection.selected)?;

    let labels = test.frame().select([DATE, SYMBOL, LABEL])?;
    let result = Backtest::new(*backtest).evaluate(&composite, COMPOSITE, &labels, LABEL)?;
    info!(
        selected = ?selection.selected,
        ic_mean = result.ic_mean,
        "multi-factor run finished"
    );

    Ok(MultiFactorRun {
        importance: selection.ranking.iter().map(ImportanceRow::from).collect(),
        result: ResultRow::new(MULTIFACTOR, &result),
        selection,
        composite,
    })
}
