//! Batch single-factor evaluation.

use polars::prelude::*;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::{Backtest, BacktestError, BacktestResult};

/// Outcome of one factor in a batch.
#[derive(Debug)]
pub struct FactorOutcome {
    /// Factor column name
    pub factor: String,
    /// The factor's result, or why it could not be evaluated
    pub result: Result<BacktestResult, BacktestError>,
}

impl FactorOutcome {
    /// Whether the factor was evaluated.
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

impl Backtest {
    /// Evaluate every listed factor column of `table` against `label_col`.
    ///
    /// Factors are evaluated in parallel. A failing factor is recorded in
    /// its outcome and never stops the batch. Outcomes keep the order of
    /// `factors`.
    pub fn evaluate_all(
        &self,
        table: &DataFrame,
        factors: &[String],
        label_col: &str,
    ) -> Vec<FactorOutcome> {
        self.evaluate_all_with(table, factors, label_col, |_| {})
    }

    /// Like [`Backtest::evaluate_all`], calling `on_done` as each factor
    /// finishes.
    pub fn evaluate_all_with<F>(
        &self,
        table: &DataFrame,
        factors: &[String],
        label_col: &str,
        on_done: F,
    ) -> Vec<FactorOutcome>
    where
        F: Fn(&FactorOutcome) + Sync,
    {
        let outcomes: Vec<FactorOutcome> = factors
            .par_iter()
            .map(|factor| {
                let outcome = FactorOutcome {
                    factor: factor.clone(),
                    result: self.evaluate_column(table, factor, label_col),
                };
                if let Err(err) = &outcome.result {
                    warn!(factor = %factor, error = %err, "factor evaluation failed");
                }
                on_done(&outcome);
                outcome
            })
            .collect();

        let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
        info!(factors = outcomes.len(), failed, "evaluated factor batch");
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_failure_does_not_halt_batch() {
        let table = df![
            "date" => ["d1", "d1", "d1", "d2", "d2", "d2"],
            "symbol" => ["a", "b", "c", "a", "b", "c"],
            "alpha01" => [1.0, 2.0, 3.0, 3.0, 2.0, 1.0],
            "alpha02" => [0.5, 0.5, 0.5, 0.1, 0.2, 0.3],
            "label" => [0.01, 0.02, 0.03, 0.01, 0.02, 0.03]
        ]
        .unwrap();
        let factors: Vec<String> = ["alpha01", "missing", "alpha02"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let done = AtomicUsize::new(0);
        let outcomes = Backtest::default().evaluate_all_with(&table, &factors, "label", |_| {
            done.fetch_add(1, Ordering::Relaxed);
        });

        assert_eq!(done.load(Ordering::Relaxed), 3);
        let names: Vec<&str> = outcomes.iter().map(|o| o.factor.as_str()).collect();
        assert_eq!(names, vec!["alpha01", "missing", "alpha02"]);
        assert!(outcomes[0].is_ok());
        assert!(matches!(
            outcomes[1].result,
            Err(BacktestError::MissingField { .. })
        ));
        assert!(outcomes[2].is_ok());
    }
}
