use serde_json::Value;

/// Reduces a loosely shaped raw value to a finite number.
///
/// Accepts bare numbers, numeric strings (surrounding whitespace, thousands separators and a
/// trailing `%` are tolerated) and `{ "value": …, "source": … }` wrappers. Anything else,
/// including non-finite results, yields `None`.
pub fn extract_numeric_value(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(number) => number.as_f64().filter(|value| value.is_finite()),
        Value::String(text) => parse_numeric_text(text),
        Value::Object(map) => match map.get("value") {
            Some(Value::Object(_)) | None => None,
            Some(inner) => extract_numeric_value(inner),
        },
        Value::Null | Value::Bool(_) | Value::Array(_) => None,
    }
}

/// Provenance carried by a `{ value, source }` wrapper, if any.
pub fn extract_source(raw: &Value) -> Option<String> {
    raw.as_object()
        .and_then(|map| map.get("source"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|source| !source.is_empty())
        .map(str::to_string)
}

pub(crate) fn parse_numeric_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    if trimmed.is_empty() {
        return None;
    }

    let cleaned: String = trimmed.chars().filter(|c| *c != ',' && *c != '_').collect();
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}
