//! Odds conversion and margin removal.
//!
//! Pure, stateless helpers shared by the aggregator and side selector.
//! Rounding is half-to-even on the exact binary value, done through
//! `rust_decimal` so that two-decimal averages compare the same way on
//! every platform.

use rust_decimal::prelude::*;
use rust_decimal::RoundingStrategy;

use crate::types::{ConsensusError, FairPrice};

// ---------------------------------------------------------------------------
// Rounding
// ---------------------------------------------------------------------------

/// Round to `dp` decimal places, ties to even.
pub fn round_dp(value: f64, dp: u32) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Round to the nearest integer, ties to even.
fn round_to_i64(value: f64) -> Option<i64> {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_i64())
}

fn check_price(price: f64) -> Result<f64, ConsensusError> {
    if price.is_finite() && price > 1.0 {
        Ok(price)
    } else {
        Err(ConsensusError::InvalidPrice { price })
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Convert decimal odds to American odds.
///
/// Prices of 2.0 and above become positive (profit per 100 staked);
/// prices below 2.0 become negative (stake needed to profit 100).
pub fn decimal_to_american(decimal_price: f64) -> Result<i64, ConsensusError> {
    let price = check_price(decimal_price)?;

    let american = if price >= 2.0 {
        (price - 1.0) * 100.0
    } else {
        -(100.0 / (price - 1.0))
    };

    round_to_i64(american).ok_or(ConsensusError::InvalidPrice { price })
}

/// Implied probability of American odds, as a percentage with two decimals.
///
/// The caller guarantees `american_price != 0`.
pub fn implied_probability(american_price: i64) -> f64 {
    let a = american_price as f64;
    let probability = if american_price > 0 {
        100.0 / (a + 100.0)
    } else {
        -a / (-a + 100.0)
    };
    round_dp(probability * 100.0, 2)
}

/// Remove the margin from a two-sided market, returning fair probabilities.
pub fn devig_probabilities(over_decimal: f64, under_decimal: f64) -> Result<FairPrice, ConsensusError> {
    let over_prob = 1.0 / check_price(over_decimal)?;
    let under_prob = 1.0 / check_price(under_decimal)?;

    // > 1.0 whenever the book carries a margin
    let total = over_prob + under_prob;

    Ok(FairPrice {
        fair_over_prob: over_prob / total,
        fair_under_prob: under_prob / total,
    })
}

/// Remove the margin from a two-sided market, returning fair decimal odds
/// `(fair_over, fair_under)`.
pub fn devig_pair(over_decimal: f64, under_decimal: f64) -> Result<(f64, f64), ConsensusError> {
    devig_probabilities(over_decimal, under_decimal).map(|fair| fair.to_decimal())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
