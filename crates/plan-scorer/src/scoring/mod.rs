//! Normalization and weighted scoring of proposals.

mod normalization;
mod ranking;
mod rules;

pub use normalization::{normalize, NormalizationStrategy, ValueRange, TIE_SCORE};
pub use ranking::relative_to_best;
pub(crate) use rules::round2;

use crate::catalog::IndicatorCatalog;
use crate::proposals::Proposal;
use crate::weights::{validate, WeightConfiguration};
use rules::IndicatorRanges;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Score breakdown for one proposal. Every value lies in 0–100.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub total: f64,
    pub categories: BTreeMap<String, f64>,
    /// Normalized value per `"category.indicator"` key, before weighting.
    pub indicators: BTreeMap<String, f64>,
}

/// A proposal together with the scores computed for it in one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredProposal {
    #[serde(flatten)]
    pub proposal: Proposal,
    pub scores: Scores,
    pub completion_rate: u8,
    pub rank: usize,
    pub relative_score: f64,
}

/// Stateless engine applying one normalization strategy to a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine {
    strategy: NormalizationStrategy,
}

impl ScoringEngine {
    pub fn new(strategy: NormalizationStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> NormalizationStrategy {
        self.strategy
    }

    pub fn score(
        &self,
        proposals: &[Proposal],
        catalog: &IndicatorCatalog,
        weights: &WeightConfiguration,
    ) -> Vec<ScoredProposal> {
        recompute_scores(proposals, catalog, weights, self.strategy)
    }
}

/// Full, from-scratch evaluation of `proposals` under `weights`.
///
/// Proposals that are not processed or carry no data are left out. An invalid weight
/// configuration produces zero scores for every remaining proposal rather than an error.
/// The output is sorted by total score, highest first, ties in input order.
pub fn recompute_scores(
    proposals: &[Proposal],
    catalog: &IndicatorCatalog,
    weights: &WeightConfiguration,
    strategy: NormalizationStrategy,
) -> Vec<ScoredProposal> {
    let in_scope: Vec<&Proposal> = proposals
        .iter()
        .filter(|proposal| proposal.is_scorable())
        .collect();
    let excluded = proposals.len() - in_scope.len();
    if excluded > 0 {
        tracing::debug!(excluded, "skipping proposals that are not ready for scoring");
    }

    let valid = validate(weights);
    if !valid {
        tracing::warn!(
            proposals = in_scope.len(),
            "weight configuration has no positive category weight; scores are zero-filled"
        );
    }

    let ranges = IndicatorRanges::collect(&in_scope, weights);
    let scored = in_scope
        .into_iter()
        .map(|proposal| {
            let scores = if valid {
                rules::score_proposal(proposal, weights, catalog, &ranges, strategy)
            } else {
                rules::zero_scores(weights)
            };
            ScoredProposal {
                proposal: proposal.clone(),
                scores,
                completion_rate: rules::completion_rate(proposal, weights),
                rank: 0,
                relative_score: 0.0,
            }
        })
        .collect();

    ranking::rank(scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proposals::{IndicatorValue, ProposalStatus};

    fn proposal(name: &str, values: &[(&str, f64)]) -> Proposal {
        Proposal::processed(
            name,
            values
                .iter()
                .map(|(id, value)| (id.to_string(), IndicatorValue::new(*value, "test"))),
        )
    }

    fn weights(entries: &[(&str, f64, &[(&str, f64)])]) -> WeightConfiguration {
        let mut config = WeightConfiguration::default();
        for (category, weight, indicators) in entries {
            config.set_category_weight(category, *weight);
            for (indicator, indicator_weight) in indicators.iter() {
                config.set_indicator_weight(category, indicator, *indicator_weight);
            }
        }
        config
    }

    fn names(scored: &[ScoredProposal]) -> Vec<&str> {
        scored
            .iter()
            .map(|entry| entry.proposal.name.as_str())
            .collect()
    }

    #[test]
    fn single_indicator_max_ratio_example() {
        let catalog = IndicatorCatalog::standard();
        let config = weights(&[("land_use", 100.0, &[("gross_floor_area", 100.0)])]);
        let proposals = vec![
            proposal("A", &[("gross_floor_area", 50.0)]),
            proposal("B", &[("gross_floor_area", 100.0)]),
        ];

        let scored = recompute_scores(
            &proposals,
            &catalog,
            &config,
            NormalizationStrategy::MaxRatio,
        );

        assert_eq!(names(&scored), vec!["B", "A"]);
        assert_eq!(scored[0].scores.total, 100.0);
        assert_eq!(scored[1].scores.total, 50.0);
        assert_eq!(
            scored[1].scores.indicators["land_use.gross_floor_area"],
            50.0
        );
        assert_eq!(scored[0].rank, 1);
        assert_eq!(scored[1].relative_score, 50.0);
    }

    #[test]
    fn all_zero_values_keep_input_order() {
        let catalog = IndicatorCatalog::standard();
        let config = weights(&[("land_use", 100.0, &[("gross_floor_area", 100.0)])]);
        let proposals = vec![
            proposal("A", &[("gross_floor_area", 0.0)]),
            proposal("B", &[("gross_floor_area", 0.0)]),
        ];

        let scored = recompute_scores(
            &proposals,
            &catalog,
            &config,
            NormalizationStrategy::MaxRatio,
        );

        assert_eq!(names(&scored), vec!["A", "B"]);
        assert!(scored.iter().all(|entry| entry.scores.total == 0.0));
        assert!(scored.iter().all(|entry| entry.relative_score == 0.0));
    }

    #[test]
    fn missing_value_scores_zero_with_zero_completion() {
        let catalog = IndicatorCatalog::standard();
        let config = weights(&[("land_use", 100.0, &[("gross_floor_area", 100.0)])]);
        let proposals = vec![
            proposal("A", &[("gross_floor_area", 0.0)]),
            proposal("C", &[("parking_spaces", 12.0)]),
        ];

        let scored = recompute_scores(
            &proposals,
            &catalog,
            &config,
            NormalizationStrategy::MaxRatio,
        );

        let c = scored
            .iter()
            .find(|entry| entry.proposal.name == "C")
            .expect("C scored");
        assert_eq!(c.scores.total, 0.0);
        assert_eq!(c.completion_rate, 0);
        assert!(c.scores.indicators.is_empty());

        let a = scored
            .iter()
            .find(|entry| entry.proposal.name == "A")
            .expect("A scored");
        assert_eq!(a.scores.total, 0.0);
        assert_eq!(a.completion_rate, 100);
        assert_eq!(a.scores.indicators["land_use.gross_floor_area"], 0.0);
    }

    #[test]
    fn unscorable_proposals_are_left_out() {
        let catalog = IndicatorCatalog::standard();
        let config = weights(&[("land_use", 100.0, &[("gross_floor_area", 100.0)])]);
        let mut pending = proposal("Pending", &[("gross_floor_area", 400.0)]);
        pending.status = ProposalStatus::Processing;
        let empty = proposal("Empty", &[]);
        let ready = proposal("Ready", &[("gross_floor_area", 100.0)]);

        let scored = recompute_scores(
            &[pending, empty, ready],
            &catalog,
            &config,
            NormalizationStrategy::MinMax,
        );

        assert_eq!(names(&scored), vec!["Ready"]);
        // a single proposal ties with itself
        assert_eq!(scored[0].scores.total, TIE_SCORE);
    }

    #[test]
    fn invalid_configuration_zero_fills_every_proposal() {
        let catalog = IndicatorCatalog::standard();
        let config = weights(&[
            ("land_use", 0.0, &[("gross_floor_area", 100.0)]),
            ("mobility", f64::NAN, &[("parking_spaces", 100.0)]),
        ]);
        let proposals = vec![
            proposal("A", &[("gross_floor_area", 10.0)]),
            proposal("B", &[("gross_floor_area", 20.0), ("parking_spaces", 3.0)]),
        ];

        let scored = recompute_scores(&proposals, &catalog, &config, NormalizationStrategy::MinMax);

        assert_eq!(names(&scored), vec!["A", "B"]);
        for entry in &scored {
            assert_eq!(entry.scores.total, 0.0);
            assert_eq!(entry.scores.categories.len(), 2);
            assert!(entry.scores.categories.values().all(|score| *score == 0.0));
            assert!(entry.scores.indicators.is_empty());
        }
        assert_eq!(scored[1].completion_rate, 100);
    }

    #[test]
    fn category_scores_use_indicator_weights_only() {
        let catalog = IndicatorCatalog::standard();
        let config = weights(&[
            (
                "environment",
                25.0,
                &[("green_space_ratio", 75.0), ("embodied_carbon", 25.0)],
            ),
            ("mobility", 75.0, &[("bicycle_parking", 100.0)]),
        ]);
        let proposals = vec![
            proposal(
                "Low",
                &[
                    ("green_space_ratio", 10.0),
                    ("embodied_carbon", 500.0),
                    ("bicycle_parking", 200.0),
                ],
            ),
            proposal(
                "High",
                &[
                    ("green_space_ratio", 40.0),
                    ("embodied_carbon", 300.0),
                    ("bicycle_parking", 100.0),
                ],
            ),
        ];

        let scored = recompute_scores(&proposals, &catalog, &config, NormalizationStrategy::MinMax);
        let high = scored
            .iter()
            .find(|entry| entry.proposal.name == "High")
            .expect("High scored");

        // green space best (100), embodied carbon lowest so best (100), bicycles worst (0)
        assert_eq!(high.scores.categories["environment"], 100.0);
        assert_eq!(high.scores.categories["mobility"], 0.0);
        assert_eq!(high.scores.total, 25.0);

        let low = scored
            .iter()
            .find(|entry| entry.proposal.name == "Low")
            .expect("Low scored");
        assert_eq!(low.scores.categories["environment"], 0.0);
        assert_eq!(low.scores.total, 75.0);
        assert_eq!(names(&scored), vec!["Low", "High"]);
    }

    #[test]
    fn engine_uses_its_strategy() {
        let catalog = IndicatorCatalog::standard();
        let config = weights(&[("land_use", 100.0, &[("gross_floor_area", 100.0)])]);
        let proposals = vec![
            proposal("A", &[("gross_floor_area", 50.0)]),
            proposal("B", &[("gross_floor_area", 100.0)]),
        ];

        let min_max = ScoringEngine::default().score(&proposals, &catalog, &config);
        let a = min_max
            .iter()
            .find(|entry| entry.proposal.name == "A")
            .expect("A scored");
        assert_eq!(a.scores.total, 0.0);

        let ratio = ScoringEngine::new(NormalizationStrategy::MaxRatio)
            .score(&proposals, &catalog, &config);
        let a = ratio
            .iter()
            .find(|entry| entry.proposal.name == "A")
            .expect("A scored");
        assert_eq!(a.scores.total, 50.0);
    }
}
