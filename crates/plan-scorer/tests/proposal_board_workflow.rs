use plan_scorer::board::{ProposalBoard, ProposalUpdate};
use plan_scorer::catalog::{IndicatorCatalog, IndicatorDraft};
use plan_scorer::proposals::{ProposalCsvImporter, ProposalStatus, SOURCE_CSV_IMPORT};
use plan_scorer::results::narrative_context;
use plan_scorer::scoring::NormalizationStrategy;
use plan_scorer::weights::WeightSnapshot;
use serde_json::json;
use std::collections::BTreeMap;

fn imported_board() -> ProposalBoard {
    let data = include_bytes!("fixtures/proposals.csv");
    let proposals = ProposalCsvImporter::from_reader(&data[..]).expect("fixture imports");

    let mut board = ProposalBoard::new(IndicatorCatalog::standard(), NormalizationStrategy::MinMax);
    for proposal in proposals {
        board.add_proposal(proposal).expect("proposal added");
    }
    board
}

#[test]
fn csv_import_feeds_the_ranking() {
    let board = imported_board();
    let results = board.results();

    assert_eq!(board.proposals().len(), 4);
    assert_eq!(results.ranked.len(), 3);
    assert_eq!(results.excluded.len(), 1);

    let harbour = board
        .proposals()
        .iter()
        .find(|proposal| proposal.name == "Harbour Fields")
        .expect("empty row still imported");
    assert!(harbour.data.is_empty());
    assert_eq!(results.excluded[0], harbour.id);

    let riverside = board
        .proposals()
        .iter()
        .find(|proposal| proposal.name == "Riverside Terraces")
        .expect("riverside imported");
    let green = riverside
        .data
        .get("green_space_ratio")
        .expect("percent cell parsed");
    assert_eq!(green.value, 42.0);
    assert_eq!(green.source, SOURCE_CSV_IMPORT);

    let completion: BTreeMap<_, _> = results
        .ranked
        .iter()
        .map(|entry| (entry.proposal.name.as_str(), entry.completion_rate))
        .collect();
    assert_eq!(completion["Riverside Terraces"], 36);
    assert_eq!(completion["Timber Court"], 29);
}

#[test]
fn narrowing_weights_changes_the_leader() {
    let mut board = imported_board();

    board.set_weights_raw(&json!({
        "mobility": { "weight": 100, "indicators": { "transit_distance": 100 } }
    }));
    assert_eq!(
        board.results().leader().map(|entry| entry.proposal.name.as_str()),
        Some("Station Quarter")
    );

    board.set_weights_raw(&json!({
        "environment": { "weight": 100, "indicators": { "green_space_ratio": 100 } }
    }));
    assert_eq!(
        board.results().leader().map(|entry| entry.proposal.name.as_str()),
        Some("Timber Court")
    );
}

#[test]
fn filling_in_a_proposal_brings_it_into_the_ranking() {
    let mut board = imported_board();
    let harbour_id = board.results().excluded[0].clone();

    let mut values = BTreeMap::new();
    values.insert("plot_ratio".to_string(), json!(2.2));
    values.insert("green_space_ratio".to_string(), json!({ "value": "60%" }));
    board
        .update_proposal(
            &harbour_id,
            ProposalUpdate {
                values,
                ..ProposalUpdate::default()
            },
        )
        .expect("values recorded");

    assert_eq!(board.results().ranked.len(), 4);
    assert!(board.results().excluded.is_empty());
    let harbour = board.results().get(&harbour_id).expect("now ranked");
    assert_eq!(harbour.scores.indicators["environment.green_space_ratio"], 100.0);
    assert_eq!(harbour.proposal.status, ProposalStatus::Processed);
}

#[test]
fn custom_indicators_take_part_in_scoring() {
    let mut board = imported_board();
    board
        .add_indicator(IndicatorDraft {
            id: "noise_exposure".to_string(),
            name: "Noise exposure".to_string(),
            unit: "dB".to_string(),
            description: String::new(),
            icon: String::new(),
            category: "environment".to_string(),
            lower_is_better: true,
            default_weight: 80.0,
        })
        .expect("indicator added");
    board.set_weights_raw(&json!({
        "environment": { "weight": 100, "indicators": { "noise_exposure": 100 } }
    }));

    let ids: Vec<_> = board
        .proposals()
        .iter()
        .filter(|proposal| proposal.name != "Harbour Fields")
        .map(|proposal| proposal.id.clone())
        .collect();
    for (id, decibels) in ids.iter().zip([62.0, 48.0, 70.0]) {
        let mut values = BTreeMap::new();
        values.insert("noise_exposure".to_string(), json!(decibels));
        board
            .update_proposal(
                id,
                ProposalUpdate {
                    values,
                    ..ProposalUpdate::default()
                },
            )
            .expect("value recorded");
    }

    let leader = board.results().leader().expect("leader present");
    assert_eq!(leader.proposal.name, "Station Quarter");
    assert_eq!(leader.scores.total, 100.0);
}

#[test]
fn persisted_weights_restore_on_a_fresh_board() {
    let path = std::env::temp_dir().join(format!(
        "plan-scorer-workflow-{}.json",
        std::process::id()
    ));
    let mut board = imported_board();
    board.set_weights_raw(&json!({
        "economy": { "weight": 70, "indicators": { "construction_cost": 90 } },
        "community": { "weight": 30, "indicators": { "affordable_housing_ratio": 100 } }
    }));
    WeightSnapshot::from_config(board.weights())
        .save(&path)
        .expect("snapshot saved");

    let snapshot = WeightSnapshot::load(&path)
        .expect("snapshot readable")
        .expect("snapshot present");
    let mut restored = ProposalBoard::new(IndicatorCatalog::standard(), NormalizationStrategy::MinMax);
    restored.set_weights(snapshot.into_config(restored.catalog()));

    assert_eq!(restored.weights(), board.weights());
    let _ = std::fs::remove_file(path);
}

#[test]
fn narrative_context_reflects_current_results() {
    let board = imported_board();
    let text = narrative_context(board.results(), board.catalog(), board.weights());

    assert!(text.starts_with("Evaluation of 3 proposal(s), normalization min_max."));
    assert!(text.contains("Distance to transit stop"));
    assert!(text.contains("1. "));
}
