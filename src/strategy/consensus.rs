//! Weighted multi-bookmaker consensus.
//!
//! Each bookmaker's two-sided market is devigged on its own before
//! blending, because raw margins differ from book to book. The blend is a
//! trust-weighted average over the books listed in the sport's
//! weighting table.

use tracing::debug;

use super::odds::{devig_pair, round_dp};
use crate::sports::weights::WeightingTable;
use crate::types::{BookmakerPair, ConsensusError, PropGroup, Side};

/// Weighted fair decimal prices for one proposition, rounded to 2 dp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsensusPair {
    pub avg_fair_over: Option<f64>,
    pub avg_fair_under: Option<f64>,
    /// Number of weighted books that fed the average.
    pub weighted_books: usize,
}

/// Collapse a group's quotes into one Over/Under pair per bookmaker.
///
/// Books keep first-seen order. A repeated bookmaker/side overwrites the
/// earlier price (last one wins).
pub fn bookmaker_pairs(group: &PropGroup) -> Vec<(String, BookmakerPair)> {
    let mut pairs: Vec<(String, BookmakerPair)> = Vec::new();

    for quote in &group.quotes {
        let idx = match pairs.iter().position(|(book, _)| *book == quote.bookmaker) {
            Some(idx) => idx,
            None => {
                pairs.push((quote.bookmaker.clone(), BookmakerPair::default()));
                pairs.len() - 1
            }
        };

        let slot = match quote.side {
            Side::Over => &mut pairs[idx].1.over_price,
            Side::Under => &mut pairs[idx].1.under_price,
        };
        if let Some(previous) = slot.replace(quote.price) {
            debug!(
                player = %group.player_name,
                market = %group.market_code,
                bookmaker = %quote.bookmaker,
                side = %quote.side,
                previous,
                price = quote.price,
                "Duplicate bookmaker quote, keeping the later price"
            );
        }
    }

    pairs
}

/// Compute the weighted consensus for one proposition.
///
/// Returns `Ok(None)` when no weighted bookmaker quotes both sides
/// (`total_weight == 0`). A bookmaker with an invalid price fails the
/// whole group.
pub fn aggregate(group: &PropGroup, weights: &WeightingTable) -> Result<Option<ConsensusPair>, ConsensusError> {
    let mut weighted_sum_over = 0.0;
    let mut weighted_sum_under = 0.0;
    let mut total_weight = 0.0;
    let mut weighted_books = 0;

    for (bookmaker, pair) in bookmaker_pairs(group) {
        let (Some(over), Some(under)) = (pair.over_price, pair.under_price) else {
            continue;
        };

        let (fair_over, fair_under) = devig_pair(over, under)?;

        match weights.weight_for(&bookmaker) {
            Some(weight) => {
                weighted_sum_over += fair_over * weight;
                weighted_sum_under += fair_under * weight;
                total_weight += weight;
                weighted_books += 1;
            }
            None => {
                debug!(bookmaker = %bookmaker, "Bookmaker not in weighting table, skipped in blend");
            }
        }
    }

    if total_weight <= 0.0 {
        return Ok(None);
    }

    Ok(Some(ConsensusPair {
        avg_fair_over: Some(round_dp(weighted_sum_over / total_weight, 2)),
        avg_fair_under: Some(round_dp(weighted_sum_under / total_weight, 2)),
        weighted_books,
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
