//! Price-ratio factors - where the close sits inside the day's range
//!
//! Each factor is the rolling mean of an intraday extreme divided by the
//! close, computed per symbol.

pub mod high_close;
pub mod low_close;

pub use high_close::{HighCloseRatioConfig, HighCloseRatioFactor};
pub use low_close::{LowCloseRatioConfig, LowCloseRatioFactor};

use polars::prelude::*;
use sieve_panel::{ByEntity, CLOSE, ratio};

use crate::traits::finish;

/// `mean_window(numerator / close)` per symbol, stored under `name`.
pub(crate) fn close_ratio_mean(
    data: LazyFrame,
    numerator: &str,
    window: usize,
    name: &str,
) -> LazyFrame {
    let step = format!("{name}_ratio");
    let scores = data
        .with_columns([ratio(col(numerator), col(CLOSE)).alias(step.as_str())])
        .with_columns([ByEntity::rolling_mean(col(step.as_str()), window).alias(name)]);
    finish(scores, name)
}
