//! Equal-frequency quantile buckets.
//!
//! Bucket edges are the `i / n` quantiles of the date's values with linear
//! interpolation. Repeated edges collapse and empty intervals are skipped, so
//! a date with few distinct values gets fewer than `n` buckets, never more
//! than its distinct count. Intervals are closed on the right and the lowest
//! value falls in bucket 0.

/// Bucket assignment of one date's cross-section.
#[derive(Debug, Clone, PartialEq)]
pub struct Buckets {
    /// Bucket of each input value, in input order
    pub assignment: Vec<usize>,
    /// Number of effective buckets `k`; assignments lie in `0..k`
    pub count: usize,
}

/// Linear-interpolation quantile of sorted values, `q` in `[0, 1]`.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Distinct bucket edges for `n_buckets` equal-frequency buckets.
pub fn quantile_edges(values: &[f64], n_buckets: usize) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut edges: Vec<f64> = (0..=n_buckets)
        .map(|i| quantile(&sorted, i as f64 / n_buckets as f64))
        .collect();
    edges.dedup();
    edges
}

/// Assign each value to one of at most `n_buckets` buckets.
///
/// Values must be finite. An empty input yields zero buckets, a constant
/// input a single bucket.
pub fn assign_buckets(values: &[f64], n_buckets: usize) -> Buckets {
    if values.is_empty() || n_buckets == 0 {
        return Buckets {
            assignment: Vec::new(),
            count: 0,
        };
    }

    let edges = quantile_edges(values, n_buckets);
    let interior = if edges.len() > 2 {
        &edges[1..edges.len() - 1]
    } else {
        &[][..]
    };

    let raw: Vec<usize> = values
        .iter()
        .map(|value| interior.iter().filter(|edge| **edge < *value).count())
        .collect();

    let mut occupied = raw.clone();
    occupied.sort_unstable();
    occupied.dedup();
    let assignment = raw
        .iter()
        .map(|bucket| occupied.partition_point(|b| b < bucket))
        .collect();

    Buckets {
        assignment,
        count: occupied.len(),
    }
}
