#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/sieve/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod backtest;
pub mod batch;
pub mod bucket;
pub mod error;
pub mod ic;
pub mod stats;

pub use backtest::{
    Backtest, BacktestConfig, BacktestResult, DailyRecord, DetailedBacktest, evaluate,
};
pub use batch::FactorOutcome;
pub use bucket::{Buckets, assign_buckets};
pub use error::{BacktestError, Result};
pub use ic::spearman;
