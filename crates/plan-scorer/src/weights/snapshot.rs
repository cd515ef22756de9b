use super::WeightConfiguration;
use crate::catalog::IndicatorCatalog;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Flat persisted form of the weights, stored under two stable keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightSnapshot {
    #[serde(default)]
    pub category_weights: BTreeMap<String, f64>,
    #[serde(default)]
    pub indicator_weights: BTreeMap<String, f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum WeightSnapshotError {
    #[error("failed to access weight snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("weight snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl WeightSnapshot {
    pub fn from_config(config: &WeightConfiguration) -> Self {
        let mut snapshot = Self::default();
        for (category, entry) in config.categories() {
            snapshot
                .category_weights
                .insert(category.clone(), entry.weight);
            for (indicator, weight) in &entry.indicators {
                snapshot
                    .indicator_weights
                    .insert(indicator.clone(), weight.weight);
            }
        }
        snapshot
    }

    /// Rebuilds the nested configuration, grouping indicators by their catalog category.
    /// Ids the catalog no longer knows are dropped.
    pub fn into_config(self, catalog: &IndicatorCatalog) -> WeightConfiguration {
        let mut config = WeightConfiguration::default();
        for (category, weight) in self.category_weights {
            if catalog.category(&category).is_none() {
                tracing::warn!(%category, "dropping weight for unknown category");
                continue;
            }
            config.set_category_weight(&category, weight);
        }

        for (indicator, weight) in self.indicator_weights {
            match catalog.indicator(&indicator) {
                Some(definition) => {
                    config.set_indicator_weight(&definition.category, &indicator, weight)
                }
                None => tracing::warn!(%indicator, "dropping weight for unknown indicator"),
            }
        }
        config
    }

    /// Decodes a snapshot from an already parsed document.
    pub fn from_value(raw: serde_json::Value) -> Result<Self, WeightSnapshotError> {
        Ok(serde_json::from_value(raw)?)
    }

    /// Reads a snapshot; a missing file is not an error.
    pub fn load(path: &Path) -> Result<Option<Self>, WeightSnapshotError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let snapshot = serde_json::from_str(&contents)?;
        Ok(Some(snapshot))
    }

    pub fn save(&self, path: &Path) -> Result<(), WeightSnapshotError> {
        let encoded = serde_json::to_string_pretty(self)?;
        std::fs::write(path, encoded)?;
        tracing::debug!(path = %path.display(), "weight snapshot saved");
        Ok(())
    }
}
