//! Histogram gradient-boosted regression trees.
//!
//! Squared-error boosting: every round fits a depth-limited tree to the
//! residuals of the current prediction on a row subsample and a column
//! subsample, then adds the shrunken tree to the prediction. Features are
//! pre-binned into at most `max_bins` quantile bins, so split search is a
//! scan over per-bin gradient sums.
//!
//! The model is only used for its feature importances.

use ndarray::{ArrayView1, ArrayView2};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::importance::{ImportanceKind, ImportanceScorer};
use crate::{Result, SelectError};

/// Boosting hyperparameters
///
/// A fit costs about `n_rounds * max_depth * subsample * rows * colsample *
/// features` bin updates, halved at worst per level by histogram
/// subtraction, plus one prediction pass over all rows per round. Lower
/// `n_rounds` or `subsample` for tables of tens of millions of rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GbmConfig {
    /// Number of boosting rounds (trees)
    pub n_rounds: usize,
    /// Shrinkage applied to every tree
    pub learning_rate: f64,
    /// Fraction of rows sampled per round, without replacement
    pub subsample: f64,
    /// Fraction of columns sampled per tree
    pub colsample: f64,
    /// L2 regularization of leaf values
    pub lambda: f64,
    /// Maximum tree depth
    pub max_depth: usize,
    /// Minimum rows in a leaf
    pub min_samples_leaf: usize,
    /// Maximum histogram bins per feature
    pub max_bins: usize,
    /// Random seed for reproducibility
    pub seed: u64,
    /// Importance reported per feature
    pub importance: ImportanceKind,
}

impl Default for GbmConfig {
    fn default() -> Self {
        Self {
            n_rounds: 500,
            learning_rate: 0.05,
            subsample: 0.8,
            colsample: 0.8,
            lambda: 1.0,
            max_depth: 6,
            min_samples_leaf: 20,
            max_bins: 64,
            seed: 42,
            importance: ImportanceKind::Split,
        }
    }
}

/// Feature values replaced by their bin index.
#[derive(Debug)]
struct BinnedFeatures {
    /// `codes[feature][row]`
    codes: Vec<Vec<u16>>,
    /// Number of bins of each feature
    n_bins: Vec<usize>,
}

impl BinnedFeatures {
    fn new(features: ArrayView2<'_, f64>, max_bins: usize) -> Self {
        let max_bins = max_bins.clamp(2, u16::MAX as usize);
        let mut codes = Vec::with_capacity(features.ncols());
        let mut n_bins = Vec::with_capacity(features.ncols());

        for column in features.columns() {
            let mut sorted: Vec<f64> = column.to_vec();
            sorted.sort_by(f64::total_cmp);

            // Upper bounds of all bins but the last, at equal-count positions.
            let n = sorted.len();
            let mut bounds: Vec<f64> = (1..max_bins)
                .map(|i| sorted[(i * n / max_bins).min(n - 1)])
                .collect();
            bounds.dedup();
            if bounds.last() == sorted.last() {
                bounds.pop();
            }

            codes.push(
                column
                    .iter()
                    .map(|x| bounds.partition_point(|b| b < x) as u16)
                    .collect(),
            );
            n_bins.push(bounds.len() + 1);
        }
        Self { codes, n_bins }
    }
}

#[derive(Debug, Clone, Copy)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        bin: u16,
        left: usize,
        right: usize,
    },
}

/// A fitted regression tree over binned features.
#[derive(Debug)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn predict(&self, binned: &BinnedFeatures, row: usize) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    bin,
                    left,
                    right,
                } => {
                    index = if binned.codes[feature][row] <= bin {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    feature: usize,
    bin: u16,
    gain: f64,
}

/// Per-bin gradient sums and row counts of one node, for each sampled
/// feature in the order of [`TreeBuilder::features`].
#[derive(Debug, Clone, PartialEq)]
struct Histogram {
    sums: Vec<Vec<f64>>,
    counts: Vec<Vec<usize>>,
}

impl Histogram {
    /// Sibling histogram: `self` (the parent) minus one child.
    fn subtract(mut self, child: &Self) -> Self {
        for (parent, child) in self.sums.iter_mut().zip(&child.sums) {
            for (p, c) in parent.iter_mut().zip(child) {
                *p -= c;
            }
        }
        for (parent, child) in self.counts.iter_mut().zip(&child.counts) {
            for (p, c) in parent.iter_mut().zip(child) {
                *p -= c;
            }
        }
        self
    }
}

/// Grows one tree, accumulating importances as it splits.
///
/// Only the smaller child of a split is scanned; the larger child's
/// histogram is the parent's minus the smaller one's.
struct TreeBuilder<'a> {
    binned: &'a BinnedFeatures,
    gradients: &'a [f64],
    features: &'a [usize],
    config: &'a GbmConfig,
    importance: &'a mut [f64],
    nodes: Vec<Node>,
}

impl TreeBuilder<'_> {
    fn leaf_value(&self, sum: f64, count: usize) -> f64 {
        -sum / (count as f64 + self.config.lambda)
    }

    fn score(&self, sum: f64, count: usize) -> f64 {
        sum * sum / (count as f64 + self.config.lambda)
    }

    fn can_split(&self, n_rows: usize, depth: usize) -> bool {
        depth < self.config.max_depth && n_rows >= 2 * self.config.min_samples_leaf.max(1)
    }

    fn histogram(&self, rows: &[usize]) -> Histogram {
        let mut sums = Vec::with_capacity(self.features.len());
        let mut counts = Vec::with_capacity(self.features.len());
        for &feature in self.features {
            let bins = self.binned.n_bins[feature];
            let codes = &self.binned.codes[feature];
            let mut feature_sums = vec![0.0; bins];
            let mut feature_counts = vec![0usize; bins];
            for &row in rows {
                let bin = codes[row] as usize;
                feature_sums[bin] += self.gradients[row];
                feature_counts[bin] += 1;
            }
            sums.push(feature_sums);
            counts.push(feature_counts);
        }
        Histogram { sums, counts }
    }

    fn best_split(&self, histogram: &Histogram, n_rows: usize, total: f64) -> Option<Candidate> {
        let min_leaf = self.config.min_samples_leaf.max(1);
        let parent = self.score(total, n_rows);
        let mut best: Option<Candidate> = None;

        for (slot, &feature) in self.features.iter().enumerate() {
            let sums = &histogram.sums[slot];
            let counts = &histogram.counts[slot];
            if sums.len() < 2 {
                continue;
            }

            let (mut left_sum, mut left_count) = (0.0, 0usize);
            for bin in 0..sums.len() - 1 {
                left_sum += sums[bin];
                left_count += counts[bin];
                let right_count = n_rows - left_count;
                if left_count < min_leaf || right_count < min_leaf {
                    continue;
                }
                let gain = 0.5
                    * (self.score(left_sum, left_count)
                        + self.score(total - left_sum, right_count)
                        - parent);
                if gain > 0.0 && best.is_none_or(|b| gain > b.gain) {
                    best = Some(Candidate {
                        feature,
                        bin: bin as u16,
                        gain,
                    });
                }
            }
        }
        best
    }

    /// Grow the subtree over `rows`; `histogram` is reused when the caller
    /// already derived it.
    fn grow(&mut self, rows: Vec<usize>, histogram: Option<Histogram>, depth: usize) -> usize {
        let total: f64 = rows.iter().map(|row| self.gradients[*row]).sum();
        let index = self.nodes.len();
        self.nodes.push(Node::Leaf {
            value: self.leaf_value(total, rows.len()),
        });

        if !self.can_split(rows.len(), depth) {
            return index;
        }
        let histogram = histogram.unwrap_or_else(|| self.histogram(&rows));
        let Some(split) = self.best_split(&histogram, rows.len(), total) else {
            return index;
        };

        self.importance[split.feature] += match self.config.importance {
            ImportanceKind::Split => 1.0,
            ImportanceKind::Gain => split.gain,
        };

        let binned = self.binned;
        let codes = &binned.codes[split.feature];
        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) =
            rows.into_iter().partition(|row| codes[*row] <= split.bin);

        let (left_hist, right_hist) = if self.can_split(left_rows.len(), depth + 1)
            || self.can_split(right_rows.len(), depth + 1)
        {
            if left_rows.len() <= right_rows.len() {
                let small = self.histogram(&left_rows);
                let large = histogram.subtract(&small);
                (Some(small), Some(large))
            } else {
                let small = self.histogram(&right_rows);
                let large = histogram.subtract(&small);
                (Some(large), Some(small))
            }
        } else {
            (None, None)
        };

        let left = self.grow(left_rows, left_hist, depth + 1);
        let right = self.grow(right_rows, right_hist, depth + 1);
        self.nodes[index] = Node::Split {
            feature: split.feature,
            bin: split.bin,
            left,
            right,
        };
        index
    }
}

/// Gradient-boosted regression trees used as an importance scorer.
#[derive(Debug, Clone, Default)]
pub struct GradientBoostedTrees {
    config: GbmConfig,
}

impl GradientBoostedTrees {
    /// Create a scorer with the given hyperparameters.
    pub const fn new(config: GbmConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    pub const fn config(&self) -> &GbmConfig {
        &self.config
    }
}

impl ImportanceScorer for GradientBoostedTrees {
    fn fit(&self, features: ArrayView2<'_, f64>, label: ArrayView1<'_, f64>) -> Result<Vec<f64>> {
        let (n_rows, n_features) = features.dim();
        if label.len() != n_rows {
            return Err(SelectError::DimensionMismatch {
                expected: n_rows,
                actual: label.len(),
            });
        }
        if n_rows == 0 {
            return Err(SelectError::InsufficientData { rows_dropped: 0 });
        }

        let config = &self.config;
        let binned = BinnedFeatures::new(features, config.max_bins);
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let base = label.sum() / n_rows as f64;
        let mut prediction = vec![base; n_rows];
        let mut gradients = vec![0.0; n_rows];
        let mut importance = vec![0.0; n_features];

        let n_sampled_rows = ((n_rows as f64 * config.subsample).ceil() as usize).clamp(1, n_rows);
        let n_sampled_features =
            ((n_features as f64 * config.colsample).ceil() as usize).clamp(1, n_features.max(1));
        let mut row_pool: Vec<usize> = (0..n_rows).collect();
        let mut feature_pool: Vec<usize> = (0..n_features).collect();

        for _ in 0..config.n_rounds {
            for (gradient, (pred, y)) in gradients.iter_mut().zip(prediction.iter().zip(label)) {
                *gradient = pred - y;
            }

            row_pool.shuffle(&mut rng);
            feature_pool.shuffle(&mut rng);
            let mut rows = row_pool[..n_sampled_rows].to_vec();
            rows.sort_unstable();
            let mut columns = feature_pool[..n_sampled_features.min(n_features)].to_vec();
            columns.sort_unstable();

            let mut builder = TreeBuilder {
                binned: &binned,
                gradients: &gradients,
                features: &columns,
                config,
                importance: &mut importance,
                nodes: Vec::new(),
            };
            builder.grow(rows, None, 0);
            let tree = Tree {
                nodes: builder.nodes,
            };

            for (row, pred) in prediction.iter_mut().enumerate() {
                *pred += config.learning_rate * tree.predict(&binned, row);
            }
        }

        debug!(
            rows = n_rows,
            features = n_features,
            rounds = config.n_rounds,
            "fitted gradient-boosted trees"
        );
        Ok(importance)
    }

    fn seed(&self) -> u64 {
        self.config.seed
    }
}
