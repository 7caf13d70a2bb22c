//! Correlation factors - co-movement of price and volume
//!
//! Two shapes live here. Rank correlations first rank both fields across
//! symbols on each date, then correlate the two rank series per symbol over a
//! rolling window. Raw correlations correlate the fields themselves per
//! symbol, optionally weighted by a cross-sectional rank afterwards.

pub mod high_volume;
pub mod open_volume;
pub mod rank_corr;

pub use high_volume::{HighVolumeCorrConfig, HighVolumeCorrFactor};
pub use open_volume::{OpenVolumeCorrConfig, OpenVolumeCorrFactor};
pub use rank_corr::{
    OpenVolumeRankCorrFactor, RankCorrConfig, VwapVolumeRankCorrFactor, rank_correlation,
};
