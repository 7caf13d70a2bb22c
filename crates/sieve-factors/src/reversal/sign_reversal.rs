//! Sign Reversal Factor
//!
//! `sign(Δvolume) × (−Δclose)`: a price move on rising volume is expected to
//! reverse, a move on falling volume to continue.

use polars::prelude::*;
use sieve_panel::{ByEntity, CLOSE, DATE, Projection, SYMBOL, VOLUME, sign};

use crate::traits::finish;
use crate::{Factor, FactorCategory, Result};

/// One-day volume-signed price reversal
#[derive(Debug, Clone, Copy, Default)]
pub struct SignReversalFactor;

impl Factor for SignReversalFactor {
    fn name(&self) -> &'static str {
        "alpha10"
    }

    fn description(&self) -> &'static str {
        "Sign of the volume change times the negated close change"
    }

    fn category(&self) -> FactorCategory {
        FactorCategory::Reversal
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[DATE, SYMBOL, CLOSE, VOLUME]
    }

    fn projections(&self) -> &'static [Projection] {
        &[Projection::ByEntity]
    }

    fn lookback(&self) -> usize {
        1
    }

    fn compute_scores(&self, data: LazyFrame) -> Result<LazyFrame> {
        let name = self.name();
        let scores = data
            .with_columns([
                ByEntity::diff(col(VOLUME), 1).alias("alpha10_dvolume"),
                ByEntity::diff(col(CLOSE), 1).alias("alpha10_dclose"),
            ])
            .with_columns([
                (sign(col("alpha10_dvolume")) * (lit(-1.0) * col("alpha10_dclose"))).alias(name),
            ]);
        Ok(finish(scores, name))
    }
}
