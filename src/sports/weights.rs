//! Bookmaker trust weights.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::ConsensusError;

/// Per-sport mapping of bookmaker display name to trust weight (0..=1).
///
/// Bookmakers missing from the table are still devigged but carry no
/// weight in the consensus blend, unless the table was built with
/// `uniform`, in which case every bookmaker weighs the same. Names match
/// case-sensitively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightingTable {
    weights: HashMap<String, f64>,
    #[serde(skip)]
    unlisted_weight: Option<f64>,
}

impl WeightingTable {
    pub fn from_pairs(pairs: &[(&str, f64)]) -> Self {
        Self {
            weights: pairs.iter().map(|(book, w)| (book.to_string(), *w)).collect(),
            unlisted_weight: None,
        }
    }

    /// Equal weights across `bookmakers`, summing to 1.0.
    pub fn equal(bookmakers: &[&str]) -> Self {
        let weight = if bookmakers.is_empty() {
            0.0
        } else {
            1.0 / bookmakers.len() as f64
        };
        Self {
            weights: bookmakers.iter().map(|b| (b.to_string(), weight)).collect(),
            unlisted_weight: None,
        }
    }

    /// Every bookmaker that quotes both sides weighs the same: a plain
    /// average of the devigged books.
    pub fn uniform() -> Self {
        Self {
            weights: HashMap::new(),
            unlisted_weight: Some(1.0),
        }
    }

    pub fn weight_for(&self, bookmaker: &str) -> Option<f64> {
        self.weights.get(bookmaker).copied().or(self.unlisted_weight)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Reject empty tables and weights outside `0..=1`.
    pub fn validate(&self) -> Result<(), ConsensusError> {
        if self.unlisted_weight.is_some() {
            return Ok(());
        }
        if self.weights.is_empty() {
            return Err(ConsensusError::Config("weighting table is empty".into()));
        }
        for (book, weight) in &self.weights {
            if !weight.is_finite() || !(0.0..=1.0).contains(weight) {
                return Err(ConsensusError::Config(format!(
                    "weight for {book} must be within 0..=1, got {weight}"
                )));
            }
        }
        if self.weights.values().all(|w| *w == 0.0) {
            return Err(ConsensusError::Config("all bookmaker weights are zero".into()));
        }
        Ok(())
    }
}
