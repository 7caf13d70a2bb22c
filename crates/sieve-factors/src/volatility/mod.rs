//! Volatility factors - intraday body size and its dispersion

pub mod intraday;

pub use intraday::{
    IntradayDispersionConfig, IntradayDispersionFactor, ShortIntradayDispersionFactor,
    intraday_dispersion,
};
