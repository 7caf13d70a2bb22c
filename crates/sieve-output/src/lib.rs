#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/sieve/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod record;
pub mod summary;

pub use export::{ExportError, ExportFormat, Exporter, read_results};
pub use record::{ImportanceRow, MULTIFACTOR, ResultRow};
pub use summary::EvaluationSummary;
