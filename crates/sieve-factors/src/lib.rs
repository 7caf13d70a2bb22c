#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/sieve/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod correlation;
pub mod error;
pub mod momentum;
pub mod price_ratio;
pub mod registry;
pub mod reversal;
pub mod table;
pub mod traits;
pub mod volatility;

pub use error::{FactorError, Result};
pub use traits::{ConfigurableFactor, Factor, FactorConfig};

// Re-export registry types for convenience
pub use registry::{
    FactorCategory, FactorInfo, FactorRegistry, available_factors, count_by_category,
    factors_by_category, get_factor_info, list_factor_names,
};
pub use table::{FactorTable, build_factor_table};
