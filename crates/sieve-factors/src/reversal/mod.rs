//! Reversal factors - short-horizon mean reversion
//!
//! Both factors bet against yesterday's move: one on the realized return,
//! one on the close-to-close change conditioned on the volume change.

pub mod label_reversal;
pub mod sign_reversal;

pub use label_reversal::{LabelReversalConfig, LabelReversalFactor};
pub use sign_reversal::SignReversalFactor;
