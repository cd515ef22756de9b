//! Weight configuration: category shares and indicator shares within each category.
//!
//! Weights are relative shares within whatever is configured. They are not required to add
//! up to 100; the scoring engine divides by the weight actually in play for each proposal.

mod snapshot;
mod standardize;

pub use snapshot::{WeightSnapshot, WeightSnapshotError};
pub use standardize::standardize;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Share of one indicator within its category, on a 0–100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorWeight {
    pub weight: f64,
}

/// Share of one category in the overall score plus its indicator weights.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeight {
    pub weight: f64,
    #[serde(default)]
    pub indicators: BTreeMap<String, IndicatorWeight>,
}

impl CategoryWeight {
    pub fn is_active(&self) -> bool {
        is_positive(self.weight)
    }
}

/// Canonical nested weight structure consumed by the scoring engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightConfiguration {
    categories: BTreeMap<String, CategoryWeight>,
}

impl WeightConfiguration {
    pub fn new(categories: BTreeMap<String, CategoryWeight>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &BTreeMap<String, CategoryWeight> {
        &self.categories
    }

    pub fn category(&self, id: &str) -> Option<&CategoryWeight> {
        self.categories.get(id)
    }

    pub fn indicator_weight(&self, category: &str, indicator: &str) -> Option<f64> {
        self.categories
            .get(category)
            .and_then(|entry| entry.indicators.get(indicator))
            .map(|entry| entry.weight)
    }

    /// Number of indicators listed anywhere in the configuration. Listing an indicator is
    /// what selects it for evaluation, whatever its weight.
    pub fn indicator_count(&self) -> usize {
        self.categories
            .values()
            .map(|category| category.indicators.len())
            .sum()
    }

    /// Every listed `(category, indicator)` pair in key order.
    pub fn selected_indicators(&self) -> impl Iterator<Item = (&str, &str)> {
        self.categories.iter().flat_map(|(category, entry)| {
            entry
                .indicators
                .keys()
                .map(move |indicator| (category.as_str(), indicator.as_str()))
        })
    }

    pub fn set_category_weight(&mut self, category: &str, weight: f64) {
        self.categories.entry(category.to_string()).or_default().weight = weight;
    }

    pub fn set_indicator_weight(&mut self, category: &str, indicator: &str, weight: f64) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .indicators
            .insert(indicator.to_string(), IndicatorWeight { weight });
    }

    /// Drops an indicator from every category; returns whether anything was removed.
    pub fn remove_indicator(&mut self, indicator: &str) -> bool {
        let mut removed = false;
        for category in self.categories.values_mut() {
            removed |= category.indicators.remove(indicator).is_some();
        }
        removed
    }

    pub fn is_valid(&self) -> bool {
        validate(self)
    }
}

/// True iff at least one category carries a finite, positive weight.
pub fn validate(config: &WeightConfiguration) -> bool {
    config.categories.values().any(CategoryWeight::is_active)
}

pub(crate) fn is_positive(weight: f64) -> bool {
    weight.is_finite() && weight > 0.0
}
