//! Importance scorer capability.

use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::Result;

/// How a tree model turns its splits into feature importances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportanceKind {
    /// Number of splits made on the feature
    #[default]
    Split,
    /// Total loss reduction of the splits made on the feature
    Gain,
}

/// A supervised model that scores how much each feature explains the label.
///
/// Implementations must be deterministic for a fixed [`ImportanceScorer::seed`]:
/// fitting twice on the same input returns the same scores.
pub trait ImportanceScorer: Send + Sync + std::fmt::Debug {
    /// Fit on `features` (rows × columns) against `label`, returning one
    /// non-negative score per column.
    fn fit(&self, features: ArrayView2<'_, f64>, label: ArrayView1<'_, f64>) -> Result<Vec<f64>>;

    /// Seed of every random choice made while fitting.
    fn seed(&self) -> u64;
}
