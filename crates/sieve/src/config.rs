//! Pipeline configuration.
//!
//! Every field has a default, so a JSON file only needs the values it
//! changes:
//!
//! ```json
//! {
//!   "backtest": { "n_buckets": 10 },
//!   "select": { "top_k": 3, "gbm": { "n_rounds": 200 } },
//!   "split": { "test_start": "2024-07-01" }
//! }
//! ```

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sieve_eval::BacktestConfig;
use sieve_select::SelectConfig;

use crate::Result;

/// Column names of the source files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Column holding the date
    pub date_column: String,
    /// Column holding the instrument identifier
    pub symbol_column: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            date_column: "datetime".to_string(),
            symbol_column: "instrument".to_string(),
        }
    }
}

/// Inclusive train and test date ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// First training date
    pub train_start: NaiveDate,
    /// Last training date
    pub train_end: NaiveDate,
    /// First test date
    pub test_start: NaiveDate,
    /// Last test date
    pub test_end: NaiveDate,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            train_start: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap_or_default(),
            train_end: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or_default(),
            test_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            test_end: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap_or_default(),
        }
    }
}

/// Settings of every pipeline stage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Source column names
    pub source: SourceConfig,
    /// Train and test ranges
    pub split: SplitConfig,
    /// Factors to compute; empty means every registered factor
    pub factors: Vec<String>,
    /// Backtest settings
    pub backtest: BacktestConfig,
    /// Selection settings
    pub select: SelectConfig,
}

impl PipelineConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
