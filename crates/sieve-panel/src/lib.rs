#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/sieve/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod io;
pub mod panel;
pub mod projection;
pub mod schema;

pub use error::{PanelError, Result};
pub use io::{FrameFormat, read_frame, rename_keys, write_frame};
pub use panel::{Panel, vwap_expr};
pub use projection::{ByDate, ByEntity, Projection, abs, defined, null_f64, ratio, sign};
pub use schema::{
    AMOUNT, CLOSE, DATE, HIGH, INDEX, LABEL, LOW, OPEN, RAW_FIELDS, SYMBOL, VOLUME, VWAP,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
