#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/sieve/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod pipeline;

// Re-export main types from sub-crates
pub use sieve_eval as eval;
pub use sieve_factors as factors;
pub use sieve_output as output;
pub use sieve_panel as panel;
pub use sieve_select as select;

pub use config::{PipelineConfig, SourceConfig, SplitConfig};
pub use error::{PipelineError, Result};
pub use pipeline::{
    MultiFactorRun, SingleFactorRun, build, load_panel, run_multi_factor, run_single_factor,
    split,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
