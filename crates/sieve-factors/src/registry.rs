//! Factor Registry
//!
//! Every factor the library ships is registered explicitly in
//! [`FactorRegistry::standard`]. Lookups by name and category go through the
//! registry, and the free functions below expose its metadata.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sieve_panel::{Panel, Projection};

use crate::correlation::{
    HighVolumeCorrFactor, OpenVolumeCorrFactor, OpenVolumeRankCorrFactor,
    VwapVolumeRankCorrFactor,
};
use crate::momentum::PriceChangeFactor;
use crate::price_ratio::{HighCloseRatioFactor, LowCloseRatioFactor};
use crate::reversal::{LabelReversalFactor, SignReversalFactor};
use crate::volatility::{IntradayDispersionFactor, ShortIntradayDispersionFactor};
use crate::{Factor, FactorError, Result};

/// Available factor categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorCategory {
    /// Rolling means of intraday price ratios
    PriceRatio,
    /// Short-horizon reversal of returns and price changes
    Reversal,
    /// Multi-day price change
    Momentum,
    /// Rolling price/volume correlations
    Correlation,
    /// Intraday range and dispersion
    Volatility,
}

impl FactorCategory {
    /// All categories, in display order.
    pub const ALL: [Self; 5] = [
        Self::PriceRatio,
        Self::Reversal,
        Self::Momentum,
        Self::Correlation,
        Self::Volatility,
    ];

    /// Snake-case identifier.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PriceRatio => "price_ratio",
            Self::Reversal => "reversal",
            Self::Momentum => "momentum",
            Self::Correlation => "correlation",
            Self::Volatility => "volatility",
        }
    }
}

impl std::fmt::Display for FactorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FactorCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s.to_ascii_lowercase())
            .ok_or_else(|| format!("unknown factor category: {s}"))
    }
}

/// Factor metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorInfo {
    /// Factor name (unique identifier)
    pub name: &'static str,
    /// Factor category
    pub category: FactorCategory,
    /// Brief description of what the factor measures
    pub description: &'static str,
    /// Required column names in input data
    pub required_columns: &'static [&'static str],
    /// Projections the factor reads
    pub projections: &'static [Projection],
}

impl FactorInfo {
    /// Metadata of a factor instance.
    pub fn of(factor: &dyn Factor) -> Self {
        Self {
            name: factor.name(),
            category: factor.category(),
            description: factor.description(),
            required_columns: factor.required_columns(),
            projections: factor.projections(),
        }
    }
}

/// An ordered set of factors, keyed by unique name.
#[derive(Debug, Default)]
pub struct FactorRegistry {
    factors: Vec<Box<dyn Factor>>,
}

impl FactorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every factor in the library with its default configuration.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(HighCloseRatioFactor::default());
        registry.register(LowCloseRatioFactor::default());
        registry.register(LabelReversalFactor::default());
        registry.register(OpenVolumeRankCorrFactor::default());
        registry.register(IntradayDispersionFactor::default());
        registry.register(VwapVolumeRankCorrFactor::default());
        registry.register(PriceChangeFactor::default());
        registry.register(HighVolumeCorrFactor::default());
        registry.register(OpenVolumeCorrFactor::default());
        registry.register(SignReversalFactor::default());
        registry.register(ShortIntradayDispersionFactor::default());
        registry
    }

    /// Add a factor, replacing any factor registered under the same name.
    pub fn register<F: Factor + 'static>(&mut self, factor: F) -> &mut Self {
        match self.position(factor.name()) {
            Some(index) => self.factors[index] = Box::new(factor),
            None => self.factors.push(Box::new(factor)),
        }
        self
    }

    /// Keep only the named factors, in registry order.
    ///
    /// # Errors
    ///
    /// [`FactorError::UnknownFactor`] for a name that is not registered.
    pub fn retain(mut self, names: &[&str]) -> Result<Self> {
        if let Some(unknown) = names.iter().find(|name| self.position(name).is_none()) {
            return Err(FactorError::UnknownFactor((*unknown).to_string()));
        }
        self.factors.retain(|factor| names.contains(&factor.name()));
        Ok(self)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.factors.iter().position(|factor| factor.name() == name)
    }

    /// Look up a factor by name.
    pub fn get(&self, name: &str) -> Option<&dyn Factor> {
        self.position(name).map(|index| self.factors[index].as_ref())
    }

    /// Registered factors, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Factor> {
        self.factors.iter().map(|factor| factor.as_ref())
    }

    /// Number of registered factors.
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Metadata of every registered factor.
    pub fn infos(&self) -> Vec<FactorInfo> {
        self.iter().map(FactorInfo::of).collect()
    }

    /// Compute one factor by name.
    ///
    /// # Errors
    ///
    /// - [`FactorError::UnknownFactor`] if the name is not registered
    /// - [`FactorError::MissingField`] if the panel lacks a required column
    pub fn compute(&self, name: &str, panel: &Panel) -> Result<polars::prelude::DataFrame> {
        self.get(name)
            .ok_or_else(|| FactorError::UnknownFactor(name.to_string()))?
            .compute(panel)
    }
}

/// Get all available factor info
pub fn available_factors() -> Vec<FactorInfo> {
    FactorRegistry::standard().infos()
}

/// Get factors by category
pub fn factors_by_category(category: FactorCategory) -> Vec<FactorInfo> {
    available_factors()
        .into_iter()
        .filter(|f| f.category == category)
        .collect()
}

/// Get factor info by name
pub fn get_factor_info(name: &str) -> Option<FactorInfo> {
    available_factors().into_iter().find(|f| f.name == name)
}

/// List all factor names
pub fn list_factor_names() -> Vec<&'static str> {
    available_factors().into_iter().map(|f| f.name).collect()
}

/// Count factors by category
pub fn count_by_category() -> HashMap<FactorCategory, usize> {
    let mut counts = HashMap::new();
    for factor in available_factors() {
        *counts.entry(factor.category).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use sieve_panel::{DATE, SYMBOL};

    #[test]
    fn test_available_factors_count() {
        assert_eq!(available_factors().len(), 11);
    }

    #[test]
    fn test_names_are_unique_and_ordered() {
        let names = list_factor_names();
        let expected: Vec<String> = (1..=11).map(|i| format!("alpha{i:02}")).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_count_by_category() {
        let counts = count_by_category();
        assert_eq!(counts.get(&FactorCategory::PriceRatio), Some(&2));
        assert_eq!(counts.get(&FactorCategory::Reversal), Some(&2));
        assert_eq!(counts.get(&FactorCategory::Momentum), Some(&1));
        assert_eq!(counts.get(&FactorCategory::Correlation), Some(&4));
        assert_eq!(counts.get(&FactorCategory::Volatility), Some(&2));
    }

    #[test]
    fn test_factors_by_category() {
        let volatility = factors_by_category(FactorCategory::Volatility);
        let names: Vec<&str> = volatility.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["alpha05", "alpha11"]);
    }

    #[test]
    fn test_get_factor_info() {
        let info = get_factor_info("alpha04").unwrap();
        assert_eq!(info.category, FactorCategory::Correlation);
        assert!(info.required_columns.contains(&"volume"));
        assert!(info.projections.contains(&Projection::ByDate));
        assert!(info.projections.contains(&Projection::ByEntity));

        assert!(get_factor_info("nonexistent_factor").is_none());
    }

    #[test]
    fn test_all_factors_have_required_columns() {
        for factor in available_factors() {
            assert!(
                factor.required_columns.contains(&SYMBOL),
                "Factor {} missing 'symbol' in required columns",
                factor.name
            );
            assert!(
                factor.required_columns.contains(&DATE),
                "Factor {} missing 'date' in required columns",
                factor.name
            );
            assert!(
                !factor.projections.is_empty(),
                "Factor {} declares no projection",
                factor.name
            );
        }
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = FactorRegistry::standard();
        registry.register(PriceChangeFactor::default());
        assert_eq!(registry.len(), 11);
    }

    #[test]
    fn test_retain() {
        let registry = FactorRegistry::standard()
            .retain(&["alpha09", "alpha01"])
            .unwrap();
        let names: Vec<&str> = registry.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["alpha01", "alpha09"]);

        assert!(matches!(
            FactorRegistry::standard().retain(&["alpha99"]),
            Err(FactorError::UnknownFactor(name)) if name == "alpha99"
        ));
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!(
            "price_ratio".parse::<FactorCategory>(),
            Ok(FactorCategory::PriceRatio)
        );
        assert!("value".parse::<FactorCategory>().is_err());
    }
}
