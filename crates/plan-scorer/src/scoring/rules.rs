use super::normalization::{normalize, NormalizationStrategy, ValueRange};
use super::Scores;
use crate::catalog::IndicatorCatalog;
use crate::proposals::Proposal;
use crate::weights::{is_positive, WeightConfiguration};
use std::collections::{BTreeMap, HashMap};

/// Per-indicator value ranges across every proposal in the run.
pub(crate) struct IndicatorRanges<'a> {
    ranges: HashMap<&'a str, ValueRange>,
}

impl<'a> IndicatorRanges<'a> {
    pub(crate) fn collect(proposals: &[&Proposal], weights: &'a WeightConfiguration) -> Self {
        let ranges = weights
            .selected_indicators()
            .filter_map(|(_, indicator)| {
                let values = proposals
                    .iter()
                    .filter_map(|proposal| proposal.value_of(indicator));
                ValueRange::from_values(values).map(|range| (indicator, range))
            })
            .collect();
        Self { ranges }
    }

    fn get(&self, indicator: &str) -> Option<ValueRange> {
        self.ranges.get(indicator).copied()
    }
}

/// Weighted total, category sub-scores and per-indicator normalized values for one proposal.
///
/// Only indicators the proposal actually has a value for enter either the numerator or the
/// denominator, so a missing value shrinks the weight in play instead of scoring zero.
pub(crate) fn score_proposal(
    proposal: &Proposal,
    weights: &WeightConfiguration,
    catalog: &IndicatorCatalog,
    ranges: &IndicatorRanges<'_>,
    strategy: NormalizationStrategy,
) -> Scores {
    let mut total_weighted = 0.0;
    let mut total_possible = 0.0;
    let mut categories = BTreeMap::new();
    let mut indicators = BTreeMap::new();

    for (category_id, category) in weights.categories() {
        if !category.is_active() {
            if !category.weight.is_finite() {
                tracing::warn!(category = %category_id, "ignoring non-finite category weight");
            }
            continue;
        }
        let category_share = category.weight / 100.0;

        let mut category_weighted = 0.0;
        let mut category_possible = 0.0;

        for (indicator_id, indicator_weight) in &category.indicators {
            if !is_positive(indicator_weight.weight) {
                if !indicator_weight.weight.is_finite() {
                    tracing::warn!(
                        category = %category_id,
                        indicator = %indicator_id,
                        "ignoring non-finite indicator weight"
                    );
                }
                continue;
            }
            let Some(raw) = proposal.value_of(indicator_id) else {
                continue;
            };

            let lower_is_better = catalog
                .indicator(indicator_id)
                .map(|definition| definition.lower_is_better)
                .unwrap_or(false);
            let normalized = match ranges.get(indicator_id) {
                Some(range) if raw.is_finite() => {
                    let normalized = normalize(raw, range, strategy, lower_is_better);
                    if normalized.is_finite() {
                        normalized
                    } else {
                        tracing::warn!(
                            proposal = %proposal.id,
                            indicator = %indicator_id,
                            "normalization produced a non-finite score; counting it as zero"
                        );
                        0.0
                    }
                }
                _ => {
                    tracing::warn!(
                        proposal = %proposal.id,
                        indicator = %indicator_id,
                        "non-finite indicator value contributes nothing"
                    );
                    0.0
                }
            };

            let fraction = normalized / 100.0;
            let indicator_share = indicator_weight.weight / 100.0;
            category_weighted += fraction * indicator_share;
            category_possible += indicator_share;

            let combined_share = indicator_share * category_share;
            total_weighted += fraction * combined_share;
            total_possible += combined_share;

            indicators.insert(format!("{category_id}.{indicator_id}"), round2(normalized));
        }

        categories.insert(
            category_id.clone(),
            weighted_ratio(category_weighted, category_possible),
        );
    }

    Scores {
        total: weighted_ratio(total_weighted, total_possible),
        categories,
        indicators,
    }
}

/// Scores used when the configuration carries no usable category weight.
pub(crate) fn zero_scores(weights: &WeightConfiguration) -> Scores {
    Scores {
        total: 0.0,
        categories: weights
            .categories()
            .keys()
            .map(|category| (category.clone(), 0.0))
            .collect(),
        indicators: BTreeMap::new(),
    }
}

/// Share of selected indicators the proposal has a usable value for, as a whole percentage.
pub(crate) fn completion_rate(proposal: &Proposal, weights: &WeightConfiguration) -> u8 {
    let selected = weights.indicator_count();
    if selected == 0 {
        return 0;
    }
    let filled = weights
        .selected_indicators()
        .filter(|(_, indicator)| {
            proposal
                .value_of(indicator)
                .is_some_and(|value| value.is_finite())
        })
        .count();
    ((filled as f64 / selected as f64) * 100.0).round() as u8
}

fn weighted_ratio(weighted: f64, possible: f64) -> f64 {
    if possible > 0.0 {
        round2((weighted / possible * 100.0).clamp(0.0, 100.0))
    } else {
        0.0
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
