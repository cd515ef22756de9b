use crate::infra::{load_proposals, load_weights, parse_normalization};
use clap::Args;
use plan_scorer::board::ProposalBoard;
use plan_scorer::catalog::IndicatorCatalog;
use plan_scorer::config::AppConfig;
use plan_scorer::error::AppError;
use plan_scorer::proposals::{IndicatorValue, Proposal};
use plan_scorer::results::{narrative_context, EvaluationResults};
use plan_scorer::scoring::NormalizationStrategy;
use plan_scorer::telemetry;
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Proposal sheet: a CSV export, or a JSON array of `{name, data}` objects
    #[arg(long)]
    pub(crate) proposals: PathBuf,
    /// Weight file in nested or snapshot layout. Defaults to the catalog weights.
    #[arg(long)]
    pub(crate) weights: Option<PathBuf>,
    /// Normalization strategy (min_max or max_ratio). Defaults to SCORING_NORMALIZATION.
    #[arg(long, value_parser = parse_normalization)]
    pub(crate) normalization: Option<NormalizationStrategy>,
    /// Also print the plain-text context handed to narrative tooling
    #[arg(long)]
    pub(crate) context: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Normalization strategy (min_max or max_ratio)
    #[arg(long, value_parser = parse_normalization)]
    pub(crate) normalization: Option<NormalizationStrategy>,
    /// Also print the plain-text context handed to narrative tooling
    #[arg(long)]
    pub(crate) context: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        proposals,
        weights,
        normalization,
        context,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init_for_cli(&config.telemetry)?;

    let catalog = IndicatorCatalog::standard();
    let proposals = load_proposals(&proposals)?;
    let weights = match weights {
        Some(path) => load_weights(&path, &catalog)?,
        None => catalog.default_weights(),
    };
    let strategy = normalization.unwrap_or(config.scoring.normalization);

    let results = EvaluationResults::evaluate(&proposals, &catalog, &weights, strategy);
    print!("{}", render_results(&results, &catalog));
    if context {
        println!();
        print!("{}", narrative_context(&results, &catalog, &weights));
    }
    Ok(())
}

pub(crate) fn run_catalog() -> Result<(), AppError> {
    print!("{}", render_catalog(&IndicatorCatalog::standard()));
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        normalization,
        context,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init_for_cli(&config.telemetry)?;

    let strategy = normalization.unwrap_or(config.scoring.normalization);
    let board = demo_board(strategy);

    println!("Design proposal scoring demo");
    println!(
        "{} proposals registered, {} pending extraction",
        board.proposals().len(),
        board.results().excluded.len()
    );
    print!("{}", render_results(board.results(), board.catalog()));
    if context {
        println!();
        print!(
            "{}",
            narrative_context(board.results(), board.catalog(), board.weights())
        );
    }
    Ok(())
}

fn demo_board(strategy: NormalizationStrategy) -> ProposalBoard {
    let mut board = ProposalBoard::new(IndicatorCatalog::standard(), strategy);
    for proposal in demo_proposals() {
        if let Err(err) = board.add_proposal(proposal) {
            tracing::warn!(error = %err, "demo proposal rejected");
        }
    }
    board
}

fn demo_proposals() -> Vec<Proposal> {
    let source = "sample brief";
    let entry = |id: &str, value: f64| (id.to_string(), IndicatorValue::new(value, source));

    vec![
        Proposal::processed(
            "Riverside Terraces",
            [
                entry("gross_floor_area", 48_500.0),
                entry("plot_ratio", 2.4),
                entry("site_coverage", 38.0),
                entry("transit_distance", 420.0),
                entry("parking_spaces", 180.0),
                entry("bicycle_parking", 420.0),
                entry("green_space_ratio", 42.0),
                entry("energy_use_intensity", 95.0),
                entry("embodied_carbon", 410.0),
                entry("affordable_housing_ratio", 30.0),
                entry("public_facility_area", 2_600.0),
                entry("construction_cost", 182.0),
                entry("commercial_area", 5_200.0),
                entry("construction_period", 30.0),
            ],
        ),
        Proposal::processed(
            "Station Quarter",
            [
                entry("gross_floor_area", 61_200.0),
                entry("plot_ratio", 3.6),
                entry("site_coverage", 52.0),
                entry("transit_distance", 150.0),
                entry("parking_spaces", 90.0),
                entry("bicycle_parking", 640.0),
                entry("green_space_ratio", 24.0),
                entry("energy_use_intensity", 110.0),
                entry("embodied_carbon", 520.0),
                entry("affordable_housing_ratio", 20.0),
                entry("public_facility_area", 3_900.0),
                entry("construction_cost", 215.0),
                entry("commercial_area", 11_800.0),
                entry("construction_period", 36.0),
            ],
        ),
        Proposal::processed(
            "Timber Court",
            [
                entry("gross_floor_area", 39_800.0),
                entry("plot_ratio", 1.9),
                entry("site_coverage", 31.0),
                entry("transit_distance", 640.0),
                entry("green_space_ratio", 51.0),
                entry("energy_use_intensity", 72.0),
                entry("embodied_carbon", 260.0),
                entry("affordable_housing_ratio", 35.0),
                entry("construction_cost", 198.0),
                entry("construction_period", 26.0),
            ],
        ),
        Proposal::new("Harbour Fields"),
    ]
}

pub(crate) fn render_results(results: &EvaluationResults, catalog: &IndicatorCatalog) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Normalization: {}",
        results.strategy.label()
    );
    if !results.valid_configuration {
        let _ = writeln!(
            out,
            "Warning: no category carries a positive weight; scores are zero-filled"
        );
    }
    if results.ranked.is_empty() {
        let _ = writeln!(out, "No proposals ready for scoring");
        return out;
    }

    for row in results.table(catalog) {
        let _ = writeln!(
            out,
            "{:>2}. {:<24} total {:>6.2} | {:>5.1}% of leader | {:>3}% complete",
            row.rank, row.name, row.total, row.relative_score, row.completion_rate
        );
        for category in &row.categories {
            let _ = writeln!(out, "      - {}: {:.2}", category.label, category.score);
        }
    }

    if !results.excluded.is_empty() {
        let _ = writeln!(
            out,
            "Not scored (not processed or no data): {}",
            results
                .excluded
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    out
}

pub(crate) fn render_catalog(catalog: &IndicatorCatalog) -> String {
    let mut out = String::new();
    let weights = catalog.default_weights();
    for category in catalog.categories() {
        let share = weights
            .category(&category.id)
            .map(|entry| entry.weight)
            .unwrap_or_default();
        let _ = writeln!(out, "{} [{}] default weight {}", category.label, category.id, share);
        for indicator in catalog.indicators_in(&category.id) {
            let _ = writeln!(
                out,
                "  - {} ({}, {}) weight {}{}",
                indicator.name,
                indicator.id,
                if indicator.unit.is_empty() {
                    "unitless"
                } else {
                    indicator.unit.as_str()
                },
                indicator.default_weight,
                if indicator.lower_is_better {
                    ", lower is better"
                } else {
                    ""
                }
            );
        }
    }
    out
}
