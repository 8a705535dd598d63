//! Ranking and truncation of accepted results.

use std::cmp::Ordering;

use crate::types::ConsensusResult;

/// Stable-sort by implied probability (descending) and keep the top
/// `max_results`. Equal probabilities keep their input order.
pub fn rank_and_truncate(mut results: Vec<ConsensusResult>, max_results: usize) -> Vec<ConsensusResult> {
    results.sort_by(|a, b| {
        b.implied_probability
            .partial_cmp(&a.implied_probability)
            .unwrap_or(Ordering::Equal)
    });
    results.truncate(max_results);
    results
}
