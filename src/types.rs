//! Shared types for PROPLINE.
//!
//! These types form the data model used across all modules: raw quotes
//! as they come off the odds provider, the per-group containers the
//! engine consumes, and the ranked records it emits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Quotes
// ---------------------------------------------------------------------------

/// Which outcome of a two-way proposition a price refers to.
///
/// Providers call this the selection or the lean depending on the
/// endpoint; both parse into the same enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Over,
    Under,
}

impl Side {
    /// Capitalised label used in spreadsheet exports ("Over" / "Under").
    pub fn title(&self) -> &'static str {
        match self {
            Side::Over => "Over",
            Side::Under => "Under",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Over => write!(f, "over"),
            Side::Under => write!(f, "under"),
        }
    }
}

/// Parse a provider outcome label (case-insensitive).
impl std::str::FromStr for Side {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "over" => Ok(Side::Over),
            "under" => Ok(Side::Under),
            _ => Err(anyhow::anyhow!("Unknown side label: {s}")),
        }
    }
}

/// One bookmaker's posted price for a specific proposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Identity key, case-sensitive as received.
    pub player_name: String,
    /// Raw provider market key, e.g. `player_rush_yds`.
    pub market_code: String,
    pub line: f64,
    pub side: Side,
    /// Decimal odds.
    pub price: f64,
    /// Bookmaker display name, e.g. "Pinnacle".
    pub bookmaker: String,
}

/// All quotes for one `(player, market, line)` proposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropGroup {
    pub player_name: String,
    pub market_code: String,
    pub line: f64,
    pub quotes: Vec<Quote>,
}

impl PropGroup {
    pub fn new(player_name: impl Into<String>, market_code: impl Into<String>, line: f64) -> Self {
        Self {
            player_name: player_name.into(),
            market_code: market_code.into(),
            line,
            quotes: Vec::new(),
        }
    }

    /// Builder-style helper for tests and fixtures.
    pub fn with_quote(mut self, bookmaker: &str, side: Side, price: f64) -> Self {
        self.quotes.push(Quote {
            player_name: self.player_name.clone(),
            market_code: self.market_code.clone(),
            line: self.line,
            side,
            price,
            bookmaker: bookmaker.to_string(),
        });
        self
    }

    /// Number of distinct bookmakers quoting this proposition (either side).
    pub fn bookmaker_count(&self) -> usize {
        let mut seen: Vec<&str> = Vec::new();
        for q in &self.quotes {
            if !seen.contains(&q.bookmaker.as_str()) {
                seen.push(&q.bookmaker);
            }
        }
        seen.len()
    }
}

// ---------------------------------------------------------------------------
// Events & DFS lines
// ---------------------------------------------------------------------------

/// An upcoming game as listed by the odds provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    pub commence_time: Option<DateTime<Utc>>,
}

impl EventSummary {
    /// "Home vs Away".
    pub fn matchup(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }
}

/// Daily-fantasy sites whose posted lines drive which props are priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DfsSite {
    Underdog,
    PrizePicks,
}

impl DfsSite {
    pub const ALL: &'static [DfsSite] = &[DfsSite::Underdog, DfsSite::PrizePicks];

    /// Match a provider bookmaker key or title (case-insensitive).
    pub fn from_bookmaker(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "underdog" => Some(DfsSite::Underdog),
            "prizepicks" => Some(DfsSite::PrizePicks),
            _ => None,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            DfsSite::Underdog => "underdog",
            DfsSite::PrizePicks => "prizepicks",
        }
    }
}

impl fmt::Display for DfsSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DfsSite::Underdog => write!(f, "Underdog"),
            DfsSite::PrizePicks => write!(f, "PrizePicks"),
        }
    }
}

/// A prop line posted by a DFS site (the over side only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DfsLine {
    pub site: DfsSite,
    pub player_name: String,
    pub market_code: String,
    pub line: f64,
}

// ---------------------------------------------------------------------------
// Derived pricing
// ---------------------------------------------------------------------------

/// One bookmaker's Over/Under prices inside a group. Transient.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BookmakerPair {
    pub over_price: Option<f64>,
    pub under_price: Option<f64>,
}

/// Margin-free probabilities for one bookmaker's two-sided market.
/// Both lie in (0, 1) and sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FairPrice {
    pub fair_over_prob: f64,
    pub fair_under_prob: f64,
}

impl FairPrice {
    /// Fair decimal odds `(over, under)`.
    pub fn to_decimal(&self) -> (f64, f64) {
        (1.0 / self.fair_over_prob, 1.0 / self.fair_under_prob)
    }
}

// ---------------------------------------------------------------------------
// Engine output
// ---------------------------------------------------------------------------

/// A bookmaker quote on the selected side, re-expressed in American odds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributingQuote {
    pub bookmaker: String,
    pub side: Side,
    pub american_price: i64,
    pub market_label: String,
    pub line: f64,
}

/// One ranked consensus record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub player_name: String,
    pub market_label: String,
    pub line: f64,
    pub selected_side: Side,
    pub fair_price_american: i64,
    /// Percentage (0–100), two decimals.
    pub implied_probability: f64,
    pub contributing_quotes: Vec<ContributingQuote>,
}

impl fmt::Display for ConsensusResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} | fair {:+} ({:.2}%) | {} books",
            self.player_name,
            self.selected_side,
            self.line,
            self.market_label,
            self.fair_price_american,
            self.implied_probability,
            self.contributing_quotes.len(),
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for PROPLINE.
#[derive(Debug, thiserror::Error)]
pub enum ConsensusError {
    #[error("Invalid decimal price: {price} (must be > 1.0)")]
    InvalidPrice { price: f64 },

    #[error("Fetch error ({provider}): {message}")]
    Fetch { provider: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown or disabled sport: {0}")]
    UnknownSport(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
