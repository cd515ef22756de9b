//! Ranked output of an evaluation run and the views built on top of it.

mod context;
pub mod views;

pub use context::narrative_context;

use crate::catalog::IndicatorCatalog;
use crate::proposals::{Proposal, ProposalId};
use crate::scoring::{NormalizationStrategy, ScoredProposal, ScoringEngine};
use crate::weights::{validate, WeightConfiguration};
use serde::Serialize;
use views::{
    CategoryScoreEntry, HeatmapCell, HeatmapRow, RadarPoint, RadarSeries, ResultTableRow,
    ResultsSummary,
};

/// Everything produced by one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResults {
    pub strategy: NormalizationStrategy,
    pub valid_configuration: bool,
    pub ranked: Vec<ScoredProposal>,
    /// Proposals left out because they are not processed or have no data.
    pub excluded: Vec<ProposalId>,
}

impl EvaluationResults {
    pub fn evaluate(
        proposals: &[Proposal],
        catalog: &IndicatorCatalog,
        weights: &WeightConfiguration,
        strategy: NormalizationStrategy,
    ) -> Self {
        Self::with_engine(ScoringEngine::new(strategy), proposals, catalog, weights)
    }

    pub fn with_engine(
        engine: ScoringEngine,
        proposals: &[Proposal],
        catalog: &IndicatorCatalog,
        weights: &WeightConfiguration,
    ) -> Self {
        let ranked = engine.score(proposals, catalog, weights);
        let excluded = proposals
            .iter()
            .filter(|proposal| !proposal.is_scorable())
            .map(|proposal| proposal.id.clone())
            .collect();

        Self {
            strategy: engine.strategy(),
            valid_configuration: validate(weights),
            ranked,
            excluded,
        }
    }

    pub fn empty(strategy: NormalizationStrategy) -> Self {
        Self {
            strategy,
            valid_configuration: false,
            ranked: Vec::new(),
            excluded: Vec::new(),
        }
    }

    pub fn leader(&self) -> Option<&ScoredProposal> {
        self.ranked.first()
    }

    pub fn get(&self, id: &ProposalId) -> Option<&ScoredProposal> {
        self.ranked.iter().find(|entry| &entry.proposal.id == id)
    }

    pub fn table(&self, catalog: &IndicatorCatalog) -> Vec<ResultTableRow> {
        self.ranked
            .iter()
            .map(|entry| ResultTableRow {
                rank: entry.rank,
                proposal_id: entry.proposal.id.clone(),
                name: entry.proposal.name.clone(),
                total: entry.scores.total,
                relative_score: entry.relative_score,
                completion_rate: entry.completion_rate,
                categories: ordered_categories(catalog, entry)
                    .map(|(id, score)| CategoryScoreEntry {
                        label: catalog.category_label(id).to_string(),
                        category: id.to_string(),
                        score,
                    })
                    .collect(),
            })
            .collect()
    }

    /// One row per proposal, one cell per selected indicator; `None` marks a missing value.
    pub fn heatmap(
        &self,
        catalog: &IndicatorCatalog,
        weights: &WeightConfiguration,
    ) -> Vec<HeatmapRow> {
        self.ranked
            .iter()
            .map(|entry| HeatmapRow {
                proposal_id: entry.proposal.id.clone(),
                name: entry.proposal.name.clone(),
                cells: weights
                    .selected_indicators()
                    .map(|(category, indicator)| HeatmapCell {
                        indicator: indicator.to_string(),
                        label: catalog
                            .indicator(indicator)
                            .map(|definition| definition.name.clone())
                            .unwrap_or_else(|| indicator.to_string()),
                        category: category.to_string(),
                        value: entry
                            .scores
                            .indicators
                            .get(&format!("{category}.{indicator}"))
                            .copied(),
                    })
                    .collect(),
            })
            .collect()
    }

    /// Per-proposal category scores in catalog category order, ready for a radar chart.
    pub fn radar(&self, catalog: &IndicatorCatalog) -> Vec<RadarSeries> {
        self.ranked
            .iter()
            .map(|entry| RadarSeries {
                proposal_id: entry.proposal.id.clone(),
                name: entry.proposal.name.clone(),
                points: ordered_categories(catalog, entry)
                    .map(|(id, score)| RadarPoint {
                        axis: catalog.category_label(id).to_string(),
                        value: score,
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn summary(
        &self,
        catalog: &IndicatorCatalog,
        weights: &WeightConfiguration,
    ) -> ResultsSummary {
        ResultsSummary {
            strategy: self.strategy,
            valid_configuration: self.valid_configuration,
            leader: self.leader().map(|entry| entry.proposal.id.clone()),
            table: self.table(catalog),
            radar: self.radar(catalog),
            heatmap: self.heatmap(catalog, weights),
            excluded: self.excluded.clone(),
        }
    }
}

/// Category scores of one entry, catalog categories first, then any the catalog lacks.
fn ordered_categories<'a>(
    catalog: &'a IndicatorCatalog,
    entry: &'a ScoredProposal,
) -> impl Iterator<Item = (&'a str, f64)> {
    let known = catalog.categories().iter().filter_map(move |category| {
        entry
            .scores
            .categories
            .get(&category.id)
            .map(|score| (category.id.as_str(), *score))
    });
    let unknown = entry
        .scores
        .categories
        .iter()
        .filter(move |(id, _)| catalog.category(id).is_none())
        .map(|(id, score)| (id.as_str(), *score));
    known.chain(unknown)
}
