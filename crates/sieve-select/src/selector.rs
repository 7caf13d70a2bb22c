//! Importance-ranked factor selection.

use ndarray::{Array1, Array2};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use sieve_factors::FactorTable;
use sieve_panel::LABEL;
use tracing::{info, warn};

use crate::gbm::{GbmConfig, GradientBoostedTrees};
use crate::importance::ImportanceScorer;
use crate::{Result, SelectError};

/// Selection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectConfig {
    /// Number of factors kept
    pub top_k: usize,
    /// Hyperparameters of the default scorer
    pub gbm: GbmConfig,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            gbm: GbmConfig::default(),
        }
    }
}

/// One factor's importance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorImportance {
    /// Factor column name
    pub factor: String,
    /// Score assigned by the importance model
    pub importance: f64,
}

/// Result of a selection run.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// The top-K factors, most important first
    pub selected: Vec<String>,
    /// Every factor, sorted descending by importance
    pub ranking: Vec<FactorImportance>,
    /// Rows the model was fitted on
    pub rows_used: usize,
    /// Rows dropped for containing an undefined value
    pub rows_dropped: usize,
}

/// Fits an importance model on a factor table and keeps the top factors.
#[derive(Debug)]
pub struct Selector {
    top_k: usize,
    scorer: Box<dyn ImportanceScorer>,
}

impl Default for Selector {
    fn default() -> Self {
        Self::new(SelectConfig::default())
    }
}

impl Selector {
    /// Selector backed by [`GradientBoostedTrees`].
    pub fn new(config: SelectConfig) -> Self {
        Self {
            top_k: config.top_k,
            scorer: Box::new(GradientBoostedTrees::new(config.gbm)),
        }
    }

    /// Selector backed by a custom scorer.
    pub fn with_scorer(top_k: usize, scorer: Box<dyn ImportanceScorer>) -> Self {
        Self { top_k, scorer }
    }

    /// Number of factors kept.
    pub const fn top_k(&self) -> usize {
        self.top_k
    }

    /// Rank every factor column of `table` against its label and keep the
    /// top K.
    ///
    /// Rows with any undefined factor or label value are dropped first.
    /// Ties keep the table's column order.
    pub fn select(&self, table: &FactorTable) -> Result<Selection> {
        let factors = table.factor_names();
        if factors.is_empty() {
            return Err(SelectError::NoFactors);
        }

        let frame = table.frame();
        let columns = factors
            .iter()
            .map(|name| float_column(frame, name))
            .collect::<Result<Vec<_>>>()?;
        let label = float_column(frame, LABEL)?;

        let complete: Vec<usize> = (0..frame.height())
            .filter(|row| {
                label[*row].is_some_and(f64::is_finite)
                    && columns
                        .iter()
                        .all(|column| column[*row].is_some_and(f64::is_finite))
            })
            .collect();
        let rows_dropped = frame.height() - complete.len();
        if rows_dropped > 0 {
            warn!(
                dropped = rows_dropped,
                kept = complete.len(),
                "dropped rows with undefined values before fitting"
            );
        }
        if complete.is_empty() {
            return Err(SelectError::InsufficientData { rows_dropped });
        }

        let features = Array2::from_shape_fn((complete.len(), factors.len()), |(i, j)| {
            columns[j][complete[i]].unwrap_or(f64::NAN)
        });
        let label = Array1::from_iter(complete.iter().map(|row| label[*row].unwrap_or(f64::NAN)));

        let scores = self.scorer.fit(features.view(), label.view())?;
        if scores.len() != factors.len() {
            return Err(SelectError::DimensionMismatch {
                expected: factors.len(),
                actual: scores.len(),
            });
        }

        let mut ranking: Vec<FactorImportance> = factors
            .into_iter()
            .zip(scores)
            .map(|(factor, importance)| FactorImportance { factor, importance })
            .collect();
        ranking.sort_by(|a, b| b.importance.total_cmp(&a.importance));

        let selected: Vec<String> = ranking
            .iter()
            .take(self.top_k)
            .map(|entry| entry.factor.clone())
            .collect();
        info!(
            rows = complete.len(),
            factors = ranking.len(),
            selected = ?selected,
            "selected factors"
        );

        Ok(Selection {
            selected,
            ranking,
            rows_used: complete.len(),
            rows_dropped,
        })
    }
}

/// Select with the default scorer, keeping `top_k` factors.
pub fn select(table: &FactorTable, top_k: usize) -> Result<Selection> {
    Selector::new(SelectConfig {
        top_k,
        ..Default::default()
    })
    .select(table)
}

fn float_column(frame: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = frame
        .column(name)
        .map_err(|_| SelectError::UnknownFactor(name.to_string()))?
        .cast(&DataType::Float64)?;
    Ok(column.as_materialized_series().f64()?.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayView1, ArrayView2};

    /// Scores each column by its index, so the last column ranks first.
    #[derive(Debug)]
    struct IndexScorer;

    impl ImportanceScorer for IndexScorer {
        fn fit(&self, features: ArrayView2<'_, f64>, _: ArrayView1<'_, f64>) -> Result<Vec<f64>> {
            Ok((0..features.ncols()).map(|j| j as f64).collect())
        }

        fn seed(&self) -> u64 {
            0
        }
    }

    /// Gives every column the same score.
    #[derive(Debug)]
    struct FlatScorer;

    impl ImportanceScorer for FlatScorer {
        fn fit(&self, features: ArrayView2<'_, f64>, _: ArrayView1<'_, f64>) -> Result<Vec<f64>> {
            Ok(vec![1.0; features.ncols()])
        }

        fn seed(&self) -> u64 {
            0
        }
    }

    fn table() -> FactorTable {
        let frame = df![
            "date" => ["d1", "d1", "d2", "d2"],
            "symbol" => ["a", "b", "a", "b"],
            "alpha01" => [1.0, 2.0, 3.0, 4.0],
            "alpha02" => [0.1, 0.3, 0.2, 0.4],
            "alpha03" => [5.0, 6.0, 7.0, 8.0],
            "label" => [0.01, 0.02, 0.03, 0.04]
        ]
        .unwrap();
        FactorTable::new(frame).unwrap()
    }

    #[test]
    fn test_ranking_is_descending_and_truncated() {
        let selection = Selector::with_scorer(2, Box::new(IndexScorer))
            .select(&table())
            .unwrap();
        assert_eq!(selection.selected, vec!["alpha03", "alpha02"]);
        assert_eq!(selection.ranking.len(), 3);
        assert_eq!(selection.ranking[2].factor, "alpha01");
        assert_eq!(selection.rows_used, 4);
        assert_eq!(selection.rows_dropped, 0);
    }

    #[test]
    fn test_ties_keep_column_order() {
        let selection = Selector::with_scorer(10, Box::new(FlatScorer))
            .select(&table())
            .unwrap();
        assert_eq!(selection.selected, vec!["alpha01", "alpha02", "alpha03"]);
    }

    #[test]
    fn test_top_k_zero_selects_nothing() {
        let selection = Selector::with_scorer(0, Box::new(IndexScorer))
            .select(&table())
            .unwrap();
        assert!(selection.selected.is_empty());
        assert_eq!(selection.ranking.len(), 3);
    }
}
