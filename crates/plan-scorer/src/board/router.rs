use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{BoardError, ProposalBoard, ProposalUpdate};
use crate::catalog::{CatalogError, IndicatorDraft, IndicatorPatch};
use crate::proposals::{ProposalError, ProposalId, ProposalInput};
use crate::results::views::ResultsSummary;
use crate::results::EvaluationResults;
use crate::scoring::{NormalizationStrategy, ScoredProposal};
use crate::weights::{standardize, WeightConfiguration, WeightSnapshot};

/// Board shared between handlers, plus where weight changes are persisted.
#[derive(Clone)]
pub struct SharedBoard {
    board: Arc<RwLock<ProposalBoard>>,
    snapshot_path: Option<PathBuf>,
}

impl SharedBoard {
    pub fn new(board: ProposalBoard) -> Self {
        Self {
            board: Arc::new(RwLock::new(board)),
            snapshot_path: None,
        }
    }

    pub fn with_snapshot_path(mut self, path: Option<PathBuf>) -> Self {
        self.snapshot_path = path;
        self
    }

    pub fn read(&self) -> RwLockReadGuard<'_, ProposalBoard> {
        self.board.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, ProposalBoard> {
        self.board.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist_weights(&self, weights: &WeightConfiguration) {
        let Some(path) = &self.snapshot_path else {
            return;
        };
        if let Err(err) = WeightSnapshot::from_config(weights).save(path) {
            tracing::warn!(path = %path.display(), error = %err, "failed to persist weights");
        }
    }
}

/// Router builder exposing the catalog, weights, proposals and results over HTTP.
pub fn board_router(shared: SharedBoard) -> Router {
    Router::new()
        .route(
            "/api/v1/indicators",
            get(list_indicators).post(create_indicator),
        )
        .route(
            "/api/v1/indicators/:indicator_id",
            put(update_indicator).delete(delete_indicator),
        )
        .route("/api/v1/weights", get(get_weights).put(replace_weights))
        .route("/api/v1/weights/reset", post(reset_weights))
        .route(
            "/api/v1/proposals",
            get(list_proposals).post(create_proposal),
        )
        .route(
            "/api/v1/proposals/:proposal_id",
            get(get_proposal)
                .patch(update_proposal)
                .delete(delete_proposal),
        )
        .route("/api/v1/results", get(results_handler))
        .route("/api/v1/scores", post(score_handler))
        .with_state(shared)
}

#[derive(Debug, Serialize)]
pub(crate) struct WeightsView {
    pub(crate) weights: WeightConfiguration,
    pub(crate) valid: bool,
}

/// Stateless scoring request; omitted weights fall back to the catalog defaults.
#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    pub(crate) proposals: Vec<ProposalInput>,
    #[serde(default)]
    pub(crate) weights: Option<Value>,
    #[serde(default)]
    pub(crate) normalization: Option<NormalizationStrategy>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScoreResponse {
    pub(crate) ranked: Vec<ScoredProposal>,
    pub(crate) summary: ResultsSummary,
}

pub(crate) async fn list_indicators(State(shared): State<SharedBoard>) -> Response {
    let board = shared.read();
    let catalog = board.catalog();
    let payload = json!({
        "categories": catalog.categories(),
        "indicators": catalog.indicators(),
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn create_indicator(
    State(shared): State<SharedBoard>,
    Json(draft): Json<IndicatorDraft>,
) -> Response {
    let mut board = shared.write();
    match board.add_indicator(draft) {
        Ok(indicator) => {
            shared.persist_weights(board.weights());
            (StatusCode::CREATED, Json(indicator)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_indicator(
    State(shared): State<SharedBoard>,
    Path(indicator_id): Path<String>,
    Json(patch): Json<IndicatorPatch>,
) -> Response {
    let mut board = shared.write();
    match board.update_indicator(&indicator_id, patch) {
        Ok(indicator) => {
            shared.persist_weights(board.weights());
            (StatusCode::OK, Json(indicator)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_indicator(
    State(shared): State<SharedBoard>,
    Path(indicator_id): Path<String>,
) -> Response {
    let mut board = shared.write();
    match board.remove_indicator(&indicator_id) {
        Ok(indicator) => {
            shared.persist_weights(board.weights());
            (StatusCode::OK, Json(indicator)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_weights(State(shared): State<SharedBoard>) -> Response {
    let board = shared.read();
    let view = WeightsView {
        weights: board.weights().clone(),
        valid: board.results().valid_configuration,
    };
    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn replace_weights(
    State(shared): State<SharedBoard>,
    Json(raw): Json<Value>,
) -> Response {
    let mut board = shared.write();
    let valid = board.set_weights_raw(&raw);
    if !valid {
        tracing::info!("weights replaced with a configuration that scores nothing");
    }
    shared.persist_weights(board.weights());
    let view = WeightsView {
        weights: board.weights().clone(),
        valid,
    };
    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn reset_weights(State(shared): State<SharedBoard>) -> Response {
    let mut board = shared.write();
    board.reset_weights();
    shared.persist_weights(board.weights());
    let view = WeightsView {
        weights: board.weights().clone(),
        valid: board.results().valid_configuration,
    };
    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn list_proposals(State(shared): State<SharedBoard>) -> Response {
    let board = shared.read();
    (StatusCode::OK, Json(board.proposals().to_vec())).into_response()
}

pub(crate) async fn create_proposal(
    State(shared): State<SharedBoard>,
    Json(input): Json<ProposalInput>,
) -> Response {
    let proposal = match input.into_proposal() {
        Ok(proposal) => proposal,
        Err(err) => return error_response(err.into()),
    };
    let mut board = shared.write();
    match board.add_proposal(proposal) {
        Ok(proposal) => (StatusCode::CREATED, Json(proposal.clone())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_proposal(
    State(shared): State<SharedBoard>,
    Path(proposal_id): Path<String>,
) -> Response {
    let id = ProposalId(proposal_id);
    let board = shared.read();
    match board.results().get(&id) {
        Some(scored) => (StatusCode::OK, Json(scored.clone())).into_response(),
        None => match board.proposal(&id) {
            Some(proposal) => (StatusCode::OK, Json(proposal.clone())).into_response(),
            None => error_response(BoardError::ProposalNotFound(id)),
        },
    }
}

pub(crate) async fn update_proposal(
    State(shared): State<SharedBoard>,
    Path(proposal_id): Path<String>,
    Json(update): Json<ProposalUpdate>,
) -> Response {
    let id = ProposalId(proposal_id);
    let mut board = shared.write();
    match board.update_proposal(&id, update) {
        Ok(proposal) => (StatusCode::OK, Json(proposal.clone())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_proposal(
    State(shared): State<SharedBoard>,
    Path(proposal_id): Path<String>,
) -> Response {
    let id = ProposalId(proposal_id);
    let mut board = shared.write();
    match board.remove_proposal(&id) {
        Ok(proposal) => (StatusCode::OK, Json(proposal)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn results_handler(State(shared): State<SharedBoard>) -> Response {
    let board = shared.read();
    let summary = board.results().summary(board.catalog(), board.weights());
    (StatusCode::OK, Json(summary)).into_response()
}

pub(crate) async fn score_handler(
    State(shared): State<SharedBoard>,
    Json(request): Json<ScoreRequest>,
) -> Response {
    let board = shared.read();
    let catalog = board.catalog().clone();
    let strategy = request.normalization.unwrap_or(board.strategy());
    drop(board);

    let mut proposals = Vec::with_capacity(request.proposals.len());
    for input in request.proposals {
        match input.into_proposal() {
            Ok(proposal) => proposals.push(proposal),
            Err(err) => return error_response(err.into()),
        }
    }
    let weights = match &request.weights {
        Some(raw) => standardize(raw),
        None => catalog.default_weights(),
    };

    let results = EvaluationResults::evaluate(&proposals, &catalog, &weights, strategy);
    let summary = results.summary(&catalog, &weights);
    let response = ScoreResponse {
        ranked: results.ranked,
        summary,
    };
    (StatusCode::OK, Json(response)).into_response()
}

fn error_response(error: BoardError) -> Response {
    let status = match &error {
        BoardError::ProposalNotFound(_) | BoardError::Catalog(CatalogError::NotFound(_)) => {
            StatusCode::NOT_FOUND
        }
        BoardError::DuplicateProposal(_)
        | BoardError::Catalog(CatalogError::Duplicate(_))
        | BoardError::Catalog(CatalogError::BuiltIn(_))
        | BoardError::Proposal(ProposalError::InvalidTransition { .. }) => StatusCode::CONFLICT,
        BoardError::Proposal(_) | BoardError::Catalog(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
