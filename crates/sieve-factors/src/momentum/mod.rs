//! Momentum factors - persistence of recent price moves

pub mod price_change;

pub use price_change::{PriceChangeConfig, PriceChangeFactor};
