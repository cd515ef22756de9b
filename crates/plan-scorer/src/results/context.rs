use super::EvaluationResults;
use crate::catalog::IndicatorCatalog;
use crate::weights::WeightConfiguration;
use std::fmt::Write;

/// Plain-text digest of indicators and ranked scores, suitable as prompt context for an
/// external commentary service. Nothing in it is read back into scoring.
pub fn narrative_context(
    results: &EvaluationResults,
    catalog: &IndicatorCatalog,
    weights: &WeightConfiguration,
) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Evaluation of {} proposal(s), normalization {}.",
        results.ranked.len(),
        results.strategy.label()
    );
    if !results.valid_configuration {
        let _ = writeln!(out, "No category carries a positive weight; all scores are zero.");
    }

    let _ = writeln!(out, "\nIndicators:");
    for (category_id, category) in weights.categories() {
        let _ = writeln!(
            out,
            "- {} (category weight {}):",
            catalog.category_label(category_id),
            category.weight
        );
        for (indicator_id, weight) in &category.indicators {
            match catalog.indicator(indicator_id) {
                Some(definition) => {
                    let direction = if definition.lower_is_better {
                        "lower is better"
                    } else {
                        "higher is better"
                    };
                    let unit = if definition.unit.is_empty() {
                        String::new()
                    } else {
                        format!(" [{}]", definition.unit)
                    };
                    let _ = writeln!(
                        out,
                        "  - {}{}, weight {}, {}",
                        definition.name, unit, weight.weight, direction
                    );
                }
                None => {
                    let _ = writeln!(out, "  - {}, weight {}", indicator_id, weight.weight);
                }
            }
        }
    }

    let _ = writeln!(out, "\nRanking:");
    for entry in &results.ranked {
        let categories = entry
            .scores
            .categories
            .iter()
            .map(|(id, score)| format!("{} {:.2}", catalog.category_label(id), score))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            out,
            "{}. {}: total {:.2} ({:.0}% of leader), completion {}%{}{}",
            entry.rank,
            entry.proposal.name,
            entry.scores.total,
            entry.relative_score,
            entry.completion_rate,
            if categories.is_empty() { "" } else { "; " },
            categories
        );
    }

    out
}
