//! Indicator definitions and the categories that group them.

mod builtin;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::scoring::round2;
use crate::weights::{CategoryWeight, IndicatorWeight, WeightConfiguration};

/// A measurable criterion a proposal is judged on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub id: String,
    pub name: String,
    pub unit: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub category: String,
    #[serde(default)]
    pub lower_is_better: bool,
    pub default_weight: f64,
    #[serde(default)]
    pub custom: bool,
}

/// Named grouping of indicators sharing one category-level weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub label: String,
}

/// Fields accepted when creating a custom indicator.
#[derive(Debug, Clone, Deserialize)]
pub struct IndicatorDraft {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub category: String,
    #[serde(default)]
    pub lower_is_better: bool,
    #[serde(default = "default_custom_weight")]
    pub default_weight: f64,
}

fn default_custom_weight() -> f64 {
    50.0
}

/// Partial update for an existing custom indicator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndicatorPatch {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub category: Option<String>,
    pub lower_is_better: Option<bool>,
    pub default_weight: Option<f64>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CatalogError {
    #[error("indicator '{0}' already exists")]
    Duplicate(String),
    #[error("indicator '{0}' not found")]
    NotFound(String),
    #[error("indicator '{0}' is built in and cannot be changed")]
    BuiltIn(String),
    #[error("indicator id must not be empty")]
    EmptyId,
    #[error("category '{0}' is unknown")]
    UnknownCategory(String),
    #[error("default weight {0} must be between 1 and 100")]
    WeightOutOfRange(f64),
}

/// Ordered registry of categories and indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorCatalog {
    categories: Vec<Category>,
    indicators: Vec<Indicator>,
}

impl IndicatorCatalog {
    /// The built-in urban planning indicator set.
    pub fn standard() -> Self {
        Self {
            categories: builtin::categories(),
            indicators: builtin::indicators(),
        }
    }

    pub fn new(categories: Vec<Category>, indicators: Vec<Indicator>) -> Self {
        Self {
            categories,
            indicators,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }

    pub fn indicator(&self, id: &str) -> Option<&Indicator> {
        self.indicators.iter().find(|indicator| indicator.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn category_label<'a>(&'a self, id: &'a str) -> &'a str {
        self.category(id).map(|category| category.label.as_str()).unwrap_or(id)
    }

    pub fn indicators_in<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Indicator> {
        self.indicators
            .iter()
            .filter(move |indicator| indicator.category == category)
    }

    /// Default weights derived from the current catalog: every category that holds at least
    /// one indicator gets an equal share, indicators keep their own default weight.
    pub fn default_weights(&self) -> WeightConfiguration {
        let populated: Vec<&Category> = self
            .categories
            .iter()
            .filter(|category| self.indicators_in(&category.id).next().is_some())
            .collect();

        if populated.is_empty() {
            return WeightConfiguration::default();
        }

        let share = round2(100.0 / populated.len() as f64);
        let mut categories = BTreeMap::new();
        for category in populated {
            let indicators = self
                .indicators_in(&category.id)
                .map(|indicator| {
                    (
                        indicator.id.clone(),
                        IndicatorWeight {
                            weight: indicator.default_weight,
                        },
                    )
                })
                .collect();
            categories.insert(
                category.id.clone(),
                CategoryWeight {
                    weight: share,
                    indicators,
                },
            );
        }

        WeightConfiguration::new(categories)
    }

    pub fn add_custom(&mut self, draft: IndicatorDraft) -> Result<&Indicator, CatalogError> {
        let id = draft.id.trim().to_string();
        if id.is_empty() {
            return Err(CatalogError::EmptyId);
        }
        if self.indicator(&id).is_some() {
            return Err(CatalogError::Duplicate(id));
        }
        self.ensure_category(&draft.category)?;
        ensure_weight(draft.default_weight)?;

        tracing::info!(indicator = %id, category = %draft.category, "custom indicator added");
        self.indicators.push(Indicator {
            id,
            name: draft.name,
            unit: draft.unit,
            description: draft.description,
            icon: draft.icon,
            category: draft.category,
            lower_is_better: draft.lower_is_better,
            default_weight: draft.default_weight,
            custom: true,
        });

        Ok(&self.indicators[self.indicators.len() - 1])
    }

    pub fn update_custom(
        &mut self,
        id: &str,
        patch: IndicatorPatch,
    ) -> Result<&Indicator, CatalogError> {
        if let Some(category) = patch.category.as_deref() {
            self.ensure_category(category)?;
        }
        if let Some(weight) = patch.default_weight {
            ensure_weight(weight)?;
        }

        let position = self.custom_position(id)?;
        let indicator = &mut self.indicators[position];
        if let Some(name) = patch.name {
            indicator.name = name;
        }
        if let Some(unit) = patch.unit {
            indicator.unit = unit;
        }
        if let Some(description) = patch.description {
            indicator.description = description;
        }
        if let Some(icon) = patch.icon {
            indicator.icon = icon;
        }
        if let Some(category) = patch.category {
            indicator.category = category;
        }
        if let Some(lower_is_better) = patch.lower_is_better {
            indicator.lower_is_better = lower_is_better;
        }
        if let Some(weight) = patch.default_weight {
            indicator.default_weight = weight;
        }

        Ok(&self.indicators[position])
    }

    pub fn remove_custom(&mut self, id: &str) -> Result<Indicator, CatalogError> {
        let position = self.custom_position(id)?;
        let removed = self.indicators.remove(position);
        tracing::info!(indicator = %removed.id, "custom indicator removed");
        Ok(removed)
    }

    fn custom_position(&self, id: &str) -> Result<usize, CatalogError> {
        let position = self
            .indicators
            .iter()
            .position(|indicator| indicator.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        if !self.indicators[position].custom {
            return Err(CatalogError::BuiltIn(id.to_string()));
        }
        Ok(position)
    }

    fn ensure_category(&self, category: &str) -> Result<(), CatalogError> {
        if self.category(category).is_none() {
            return Err(CatalogError::UnknownCategory(category.to_string()));
        }
        Ok(())
    }
}

impl Default for IndicatorCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn ensure_weight(weight: f64) -> Result<(), CatalogError> {
    if weight.is_finite() && (1.0..=100.0).contains(&weight) {
        Ok(())
    } else {
        Err(CatalogError::WeightOutOfRange(weight))
    }
}
