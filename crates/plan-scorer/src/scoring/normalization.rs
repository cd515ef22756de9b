use serde::{Deserialize, Serialize};

/// How raw indicator values are mapped onto the 0–100 scale. One strategy applies to a whole
/// evaluation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationStrategy {
    /// `(v - min) / (max - min)`; every proposal gets 50 when all values tie.
    #[default]
    MinMax,
    /// `v / max`; everything is 0 when the largest value is not positive.
    MaxRatio,
}

impl NormalizationStrategy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "min_max" | "minmax" | "spread" => Some(Self::MinMax),
            "max_ratio" | "max" | "ratio" => Some(Self::MaxRatio),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::MinMax => "min_max",
            Self::MaxRatio => "max_ratio",
        }
    }
}

/// Score given to every proposal when an indicator does not discriminate between them.
pub const TIE_SCORE: f64 = 50.0;

/// Smallest and largest finite value observed for one indicator across a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        values
            .into_iter()
            .filter(|value| value.is_finite())
            .fold(None, |range: Option<Self>, value| match range {
                None => Some(Self {
                    min: value,
                    max: value,
                }),
                Some(range) => Some(Self {
                    min: range.min.min(value),
                    max: range.max.max(value),
                }),
            })
    }
}

/// Maps `value` onto 0–100 relative to `range`, inverting when lower raw values are better.
pub fn normalize(
    value: f64,
    range: ValueRange,
    strategy: NormalizationStrategy,
    lower_is_better: bool,
) -> f64 {
    let normalized = match strategy {
        NormalizationStrategy::MaxRatio => {
            if range.max <= 0.0 {
                // degenerate set: not inverted, nothing to reward
                return 0.0;
            }
            (value / range.max * 100.0).clamp(0.0, 100.0)
        }
        NormalizationStrategy::MinMax => {
            let spread = range.max - range.min;
            if spread.is_finite() {
                if spread > 0.0 {
                    ((value - range.min) / spread * 100.0).clamp(0.0, 100.0)
                } else {
                    TIE_SCORE
                }
            } else {
                // the spread overflowed; work in units of the largest magnitude instead
                let scale = range.max.abs().max(range.min.abs());
                let (value, min, max) = (value / scale, range.min / scale, range.max / scale);
                ((value - min) / (max - min) * 100.0).clamp(0.0, 100.0)
            }
        }
    };

    if lower_is_better {
        100.0 - normalized
    } else {
        normalized
    }
}
