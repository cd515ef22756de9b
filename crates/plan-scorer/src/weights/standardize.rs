use super::{CategoryWeight, IndicatorWeight, WeightConfiguration};
use crate::proposals::extract_numeric_value;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Coerces a loosely shaped weight payload into the canonical nested form. Never fails.
///
/// * a bare number is a category weight with no indicators
/// * an object contributes its `weight` (0 when missing or unusable) and its `indicators`,
///   each given either as a bare number or as `{ "weight": … }`
/// * anything else leaves an empty entry (weight 0, no indicators) under its key
///
/// A payload that is not an object standardizes to an empty configuration.
pub fn standardize(raw: &Value) -> WeightConfiguration {
    let Some(entries) = raw.as_object() else {
        tracing::warn!(kind = value_kind(raw), "weight payload is not an object; ignoring");
        return WeightConfiguration::default();
    };

    let categories = entries
        .iter()
        .map(|(key, value)| (key.clone(), standardize_category(key, value)))
        .collect();

    WeightConfiguration::new(categories)
}

fn standardize_category(key: &str, value: &Value) -> CategoryWeight {
    match value {
        Value::Number(_) => CategoryWeight {
            weight: finite_or_zero(extract_numeric_value(value)),
            indicators: BTreeMap::new(),
        },
        Value::Object(map) => CategoryWeight {
            weight: finite_or_zero(map.get("weight").and_then(extract_numeric_value)),
            indicators: map
                .get("indicators")
                .and_then(Value::as_object)
                .map(|indicators| standardize_indicators(key, indicators))
                .unwrap_or_default(),
        },
        other => {
            tracing::debug!(
                category = key,
                kind = value_kind(other),
                "unusable weight entry"
            );
            CategoryWeight::default()
        }
    }
}

fn standardize_indicators(
    category: &str,
    indicators: &Map<String, Value>,
) -> BTreeMap<String, IndicatorWeight> {
    indicators
        .iter()
        .filter_map(|(id, value)| {
            let weight = match value {
                Value::Object(map) => map.get("weight").and_then(extract_numeric_value),
                other => extract_numeric_value(other),
            };
            match weight {
                Some(weight) => Some((id.clone(), IndicatorWeight { weight })),
                None => {
                    tracing::debug!(category, indicator = %id, "dropping unusable indicator weight");
                    None
                }
            }
        })
        .collect()
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|weight| weight.is_finite()).unwrap_or(0.0)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
