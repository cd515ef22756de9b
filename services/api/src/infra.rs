use metrics_exporter_prometheus::PrometheusHandle;
use plan_scorer::board::ProposalBoard;
use plan_scorer::catalog::IndicatorCatalog;
use plan_scorer::config::ScoringConfig;
use plan_scorer::error::AppError;
use plan_scorer::proposals::{Proposal, ProposalCsvImporter, ProposalInput};
use plan_scorer::scoring::NormalizationStrategy;
use plan_scorer::weights::{standardize, WeightConfiguration, WeightSnapshot};
use serde_json::Value;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Board seeded from the standard catalog, with persisted weights applied when present.
/// An unreadable snapshot is logged and the catalog defaults are kept.
pub(crate) fn load_board(config: &ScoringConfig) -> ProposalBoard {
    let mut board = ProposalBoard::new(IndicatorCatalog::standard(), config.normalization);
    let Some(path) = config.weights_path.as_deref() else {
        return board;
    };

    match WeightSnapshot::load(path) {
        Ok(Some(snapshot)) => {
            let weights = snapshot.into_config(board.catalog());
            if !board.set_weights(weights) {
                tracing::warn!(path = %path.display(), "persisted weights carry no positive category weight");
            }
            tracing::info!(path = %path.display(), "weights restored from snapshot");
        }
        Ok(None) => {
            tracing::debug!(path = %path.display(), "no weight snapshot yet; using defaults");
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable weight snapshot");
        }
    }
    board
}

/// Reads proposals from a `.json` array of inputs or, for any other extension, a CSV export.
pub(crate) fn load_proposals(path: &Path) -> Result<Vec<Proposal>, AppError> {
    if !is_json(path) {
        return Ok(ProposalCsvImporter::from_path(path)?);
    }

    let contents = std::fs::read_to_string(path)?;
    let inputs: Vec<ProposalInput> = serde_json::from_str(&contents)?;
    let mut proposals = Vec::with_capacity(inputs.len());
    for input in inputs {
        let name = input.name.clone();
        match input.into_proposal() {
            Ok(proposal) => proposals.push(proposal),
            Err(err) => tracing::warn!(%name, error = %err, "skipping proposal"),
        }
    }
    Ok(proposals)
}

/// Accepts either the snapshot layout (`category_weights` / `indicator_weights`) or the
/// nested per-category layout, which goes through `standardize`.
pub(crate) fn load_weights(
    path: &Path,
    catalog: &IndicatorCatalog,
) -> Result<WeightConfiguration, AppError> {
    let contents = std::fs::read_to_string(path)?;
    let raw: Value = serde_json::from_str(&contents)?;
    if raw.get("category_weights").is_some() || raw.get("indicator_weights").is_some() {
        return Ok(WeightSnapshot::from_value(raw)?.into_config(catalog));
    }
    Ok(standardize(&raw))
}

pub(crate) fn parse_normalization(value: &str) -> Result<NormalizationStrategy, String> {
    NormalizationStrategy::parse(value)
        .ok_or_else(|| format!("unknown normalization '{value}', expected min_max or max_ratio"))
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "plan-scorer-api-{}-{name}",
            std::process::id()
        ));
        std::fs::write(&path, contents).expect("write scratch file");
        path
    }

    #[test]
    fn json_proposals_skip_unnamed_entries() {
        let path = scratch_file(
            "proposals.json",
            r#"[
                {"name": "Canal Yards", "data": {"plot_ratio": "2.5"}},
                {"name": "", "data": {"plot_ratio": 3}}
            ]"#,
        );

        let proposals = load_proposals(&path).expect("json loads");
        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].value_of("plot_ratio"), Some(2.5));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn csv_proposals_are_imported() {
        let path = scratch_file(
            "proposals.csv",
            "Proposal,Plot Ratio\nHarbour Fields,3.2\n",
        );

        let proposals = load_proposals(&path).expect("csv loads");
        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].value_of("plot_ratio"), Some(3.2));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn weights_accept_snapshot_and_nested_layouts() {
        let catalog = IndicatorCatalog::standard();
        let snapshot = scratch_file(
            "snapshot.json",
            r#"{"category_weights": {"mobility": 30}, "indicator_weights": {"transit_distance": 70}}"#,
        );
        let nested = scratch_file(
            "nested.json",
            r#"{"mobility": {"weight": 30, "indicators": {"transit_distance": 70}}}"#,
        );

        let from_snapshot = load_weights(&snapshot, &catalog).expect("snapshot layout");
        let from_nested = load_weights(&nested, &catalog).expect("nested layout");
        assert_eq!(from_snapshot, from_nested);
        assert_eq!(
            from_nested.indicator_weight("mobility", "transit_distance"),
            Some(70.0)
        );
        let _ = std::fs::remove_file(snapshot);
        let _ = std::fs::remove_file(nested);
    }

    #[test]
    fn malformed_snapshot_layout_is_a_snapshot_error() {
        let catalog = IndicatorCatalog::standard();
        let path = scratch_file(
            "bad-snapshot.json",
            r#"{"category_weights": "heavy", "indicator_weights": {}}"#,
        );

        let error = load_weights(&path, &catalog).expect_err("wrong shape rejected");
        assert!(matches!(error, AppError::Snapshot(_)));
        assert!(error.to_string().starts_with("weight snapshot error:"));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn board_falls_back_to_defaults_on_bad_snapshot() {
        let path = scratch_file("broken-snapshot.json", "{ not json");
        let config = ScoringConfig {
            normalization: NormalizationStrategy::MaxRatio,
            weights_path: Some(path.clone()),
        };

        let board = load_board(&config);
        assert_eq!(board.strategy(), NormalizationStrategy::MaxRatio);
        assert_eq!(board.weights(), &board.catalog().default_weights());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn unknown_normalization_is_rejected() {
        assert!(parse_normalization("median").is_err());
        assert_eq!(
            parse_normalization("max_ratio"),
            Ok(NormalizationStrategy::MaxRatio)
        );
    }
}
