#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/sieve/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod combiner;
pub mod error;
pub mod gbm;
pub mod importance;
pub mod selector;

pub use combiner::{COMPOSITE, combine};
pub use error::{Result, SelectError};
pub use gbm::{GbmConfig, GradientBoostedTrees};
pub use importance::{ImportanceKind, ImportanceScorer};
pub use selector::{FactorImportance, SelectConfig, Selection, Selector, select};
