use super::rules::round2;
use super::ScoredProposal;
use std::cmp::Ordering;

/// Orders by total score, highest first. The sort is stable, so equal totals keep their
/// input order. Also fills in rank and the score relative to the leader.
pub(crate) fn rank(mut scored: Vec<ScoredProposal>) -> Vec<ScoredProposal> {
    scored.sort_by(|a, b| {
        b.scores
            .total
            .partial_cmp(&a.scores.total)
            .unwrap_or(Ordering::Equal)
    });

    let leader = scored
        .iter()
        .map(|entry| entry.scores.total)
        .fold(0.0_f64, f64::max);

    for (position, entry) in scored.iter_mut().enumerate() {
        entry.rank = position + 1;
        entry.relative_score = relative_to_best(entry.scores.total, leader);
    }

    scored
}

/// How close `score` is to the best score of the run, as a percentage of it.
pub fn relative_to_best(score: f64, best: f64) -> f64 {
    if best > 0.0 && best.is_finite() {
        round2((score / best * 100.0).clamp(0.0, 100.0))
    } else {
        0.0
    }
}
