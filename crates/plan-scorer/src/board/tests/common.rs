use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use serde_json::Value;

use crate::board::{board_router, ProposalBoard, SharedBoard};
use crate::catalog::{IndicatorCatalog, IndicatorDraft};
use crate::proposals::{IndicatorValue, Proposal};
use crate::scoring::NormalizationStrategy;
use crate::weights::WeightConfiguration;

pub(super) fn value(indicator: &str, value: f64) -> (String, IndicatorValue) {
    (indicator.to_string(), IndicatorValue::new(value, "PDF document"))
}

/// Green space only, so totals follow one indicator.
pub(super) fn green_space_weights() -> WeightConfiguration {
    let mut weights = WeightConfiguration::default();
    weights.set_category_weight("environment", 100.0);
    weights.set_indicator_weight("environment", "green_space_ratio", 100.0);
    weights
}

pub(super) fn riverside() -> Proposal {
    Proposal::processed(
        "Riverside Terraces",
        [value("green_space_ratio", 50.0), value("plot_ratio", 2.4)],
    )
}

pub(super) fn station_quarter() -> Proposal {
    Proposal::processed(
        "Station Quarter",
        [value("green_space_ratio", 100.0), value("plot_ratio", 3.1)],
    )
}

pub(super) fn board_with_proposals() -> ProposalBoard {
    let mut board = ProposalBoard::new(
        IndicatorCatalog::standard(),
        NormalizationStrategy::MaxRatio,
    );
    board.set_weights(green_space_weights());
    board.add_proposal(riverside()).expect("first proposal added");
    board
        .add_proposal(station_quarter())
        .expect("second proposal added");
    board
}

pub(super) fn tree_canopy_draft() -> IndicatorDraft {
    IndicatorDraft {
        id: "tree_canopy".to_string(),
        name: "Tree canopy cover".to_string(),
        unit: "%".to_string(),
        description: "Share of the site under mature canopy".to_string(),
        icon: "tree".to_string(),
        category: "environment".to_string(),
        lower_is_better: false,
        default_weight: 40.0,
    }
}

pub(super) fn router_for(board: ProposalBoard) -> (axum::Router, SharedBoard) {
    let shared = SharedBoard::new(board);
    (board_router(shared.clone()), shared)
}

pub(super) fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("request builds")
}

pub(super) fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
