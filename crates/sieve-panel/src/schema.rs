//! Column names of the panel schema.

/// Date index column.
pub const DATE: &str = "date";
/// Entity index column.
pub const SYMBOL: &str = "symbol";

/// Opening price.
pub const OPEN: &str = "open";
/// Highest price.
pub const HIGH: &str = "high";
/// Lowest price.
pub const LOW: &str = "low";
/// Closing price.
pub const CLOSE: &str = "close";
/// Traded volume.
pub const VOLUME: &str = "volume";
/// Traded amount in currency units.
pub const AMOUNT: &str = "amount";
/// Volume-weighted average price, derived as `amount / volume` when absent.
pub const VWAP: &str = "vwap";
/// Realized forward return.
pub const LABEL: &str = "label";

/// Index columns, in order.
pub const INDEX: [&str; 2] = [DATE, SYMBOL];

/// Raw fields every panel must carry.
pub const RAW_FIELDS: [&str; 7] = [OPEN, HIGH, LOW, CLOSE, VOLUME, AMOUNT, LABEL];
