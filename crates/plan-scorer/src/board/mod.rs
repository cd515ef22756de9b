//! Live application state: catalog, proposals and weights, plus the results derived from
//! them. Every mutation triggers a full recompute, so readers always see results that match
//! the current inputs.

pub mod router;

#[cfg(test)]
mod tests;

pub use router::{board_router, SharedBoard};

use crate::catalog::{CatalogError, Indicator, IndicatorCatalog, IndicatorDraft, IndicatorPatch};
use crate::proposals::{
    extract_numeric_value, Proposal, ProposalError, ProposalId, ProposalStatus,
};
use crate::results::EvaluationResults;
use crate::scoring::{NormalizationStrategy, ScoringEngine};
use crate::weights::{standardize, WeightConfiguration};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BoardError {
    #[error("proposal '{0}' not found")]
    ProposalNotFound(ProposalId),
    #[error("proposal '{0}' already exists")]
    DuplicateProposal(ProposalId),
    #[error(transparent)]
    Proposal(#[from] ProposalError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Changes applied to an existing proposal. A `null` value clears that indicator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProposalUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<ProposalStatus>,
    #[serde(default)]
    pub values: BTreeMap<String, Value>,
}

#[derive(Debug, Clone)]
pub struct ProposalBoard {
    catalog: IndicatorCatalog,
    proposals: Vec<Proposal>,
    weights: WeightConfiguration,
    engine: ScoringEngine,
    results: EvaluationResults,
}

impl ProposalBoard {
    /// Empty board using the catalog's default weights.
    pub fn new(catalog: IndicatorCatalog, strategy: NormalizationStrategy) -> Self {
        let weights = catalog.default_weights();
        let mut board = Self {
            catalog,
            proposals: Vec::new(),
            weights,
            engine: ScoringEngine::new(strategy),
            results: EvaluationResults::empty(strategy),
        };
        board.refresh();
        board
    }

    pub fn catalog(&self) -> &IndicatorCatalog {
        &self.catalog
    }

    pub fn proposals(&self) -> &[Proposal] {
        &self.proposals
    }

    pub fn proposal(&self, id: &ProposalId) -> Option<&Proposal> {
        self.proposals.iter().find(|proposal| &proposal.id == id)
    }

    pub fn weights(&self) -> &WeightConfiguration {
        &self.weights
    }

    pub fn strategy(&self) -> NormalizationStrategy {
        self.engine.strategy()
    }

    /// Scores for the current proposals and weights.
    pub fn results(&self) -> &EvaluationResults {
        &self.results
    }

    pub fn set_strategy(&mut self, strategy: NormalizationStrategy) {
        self.engine = ScoringEngine::new(strategy);
        self.refresh();
    }

    /// Replaces the weights wholesale; returns whether the new configuration is valid.
    pub fn set_weights(&mut self, weights: WeightConfiguration) -> bool {
        self.weights = weights;
        self.refresh();
        self.results.valid_configuration
    }

    /// Standardizes a loosely shaped payload and installs it.
    pub fn set_weights_raw(&mut self, raw: &Value) -> bool {
        self.set_weights(standardize(raw))
    }

    pub fn reset_weights(&mut self) {
        self.set_weights(self.catalog.default_weights());
    }

    pub fn add_proposal(&mut self, proposal: Proposal) -> Result<&Proposal, BoardError> {
        if self.proposal(&proposal.id).is_some() {
            return Err(BoardError::DuplicateProposal(proposal.id));
        }
        tracing::info!(proposal = %proposal.id, name = %proposal.name, "proposal added");
        self.proposals.push(proposal);
        self.refresh();
        Ok(&self.proposals[self.proposals.len() - 1])
    }

    pub fn update_proposal(
        &mut self,
        id: &ProposalId,
        update: ProposalUpdate,
    ) -> Result<&Proposal, BoardError> {
        let position = self.position(id)?;
        let mut proposal = self.proposals[position].clone();

        if let Some(name) = update.name.as_deref() {
            proposal.rename(name)?;
        }
        for (indicator, raw) in &update.values {
            if raw.is_null() {
                proposal.clear_value(indicator);
                continue;
            }
            let value =
                extract_numeric_value(raw).ok_or_else(|| ProposalError::InvalidValue {
                    indicator: indicator.clone(),
                })?;
            proposal.set_value(indicator, value)?;
        }
        if let Some(status) = update.status {
            proposal.transition(status)?;
        }

        self.proposals[position] = proposal;
        self.refresh();
        Ok(&self.proposals[position])
    }

    pub fn remove_proposal(&mut self, id: &ProposalId) -> Result<Proposal, BoardError> {
        let position = self.position(id)?;
        let removed = self.proposals.remove(position);
        tracing::info!(proposal = %removed.id, "proposal removed");
        self.refresh();
        Ok(removed)
    }

    /// Adds a custom indicator and selects it with its default weight.
    pub fn add_indicator(&mut self, draft: IndicatorDraft) -> Result<Indicator, BoardError> {
        let indicator = self.catalog.add_custom(draft)?.clone();
        self.ensure_category_weight(&indicator.category);
        self.weights.set_indicator_weight(
            &indicator.category,
            &indicator.id,
            indicator.default_weight,
        );
        self.refresh();
        Ok(indicator)
    }

    /// Edits a custom indicator. A category change moves its weight entry along with it.
    pub fn update_indicator(
        &mut self,
        id: &str,
        patch: IndicatorPatch,
    ) -> Result<Indicator, BoardError> {
        let previous_category = self
            .catalog
            .indicator(id)
            .map(|indicator| indicator.category.clone());
        let indicator = self.catalog.update_custom(id, patch)?.clone();

        if let Some(previous) = previous_category.filter(|previous| *previous != indicator.category)
        {
            let weight = self
                .weights
                .indicator_weight(&previous, id)
                .unwrap_or(indicator.default_weight);
            self.weights.remove_indicator(id);
            self.ensure_category_weight(&indicator.category);
            self.weights
                .set_indicator_weight(&indicator.category, id, weight);
        }
        self.refresh();
        Ok(indicator)
    }

    /// Deletes a custom indicator and drops it from the weight selection.
    pub fn remove_indicator(&mut self, id: &str) -> Result<Indicator, BoardError> {
        let removed = self.catalog.remove_custom(id)?;
        self.weights.remove_indicator(id);
        self.refresh();
        Ok(removed)
    }

    /// Gives a category that has no weight entry yet its derived default share.
    fn ensure_category_weight(&mut self, category: &str) {
        if self.weights.category(category).is_some() {
            return;
        }
        let share = self
            .catalog
            .default_weights()
            .category(category)
            .map(|entry| entry.weight)
            .unwrap_or_default();
        self.weights.set_category_weight(category, share);
    }

    fn position(&self, id: &ProposalId) -> Result<usize, BoardError> {
        self.proposals
            .iter()
            .position(|proposal| &proposal.id == id)
            .ok_or_else(|| BoardError::ProposalNotFound(id.clone()))
    }

    fn refresh(&mut self) {
        self.results = EvaluationResults::with_engine(
            self.engine,
            &self.proposals,
            &self.catalog,
            &self.weights,
        );
        tracing::debug!(
            ranked = self.results.ranked.len(),
            valid = self.results.valid_configuration,
            "results recomputed"
        );
    }
}

impl Default for ProposalBoard {
    fn default() -> Self {
        Self::new(IndicatorCatalog::standard(), NormalizationStrategy::default())
    }
}
