//! Supported sports and their consensus profiles.
//!
//! A `SportProfile` bundles everything that differs between sports: the
//! bookmaker weighting table, market labels, admission thresholds, the
//! provider query (markets, regions, bookmaker filter) and the export
//! column layout. The engine itself is identical for every sport.

pub mod markets;
pub mod weights;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::ConsensusError;
use markets::MarketLabelTable;
use weights::WeightingTable;

// ---------------------------------------------------------------------------
// Sport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Nba,
    Nfl,
    Mlb,
    Nhl,
    Ncaaf,
}

impl Sport {
    pub const ALL: &'static [Sport] = &[Sport::Nba, Sport::Nfl, Sport::Mlb, Sport::Nhl, Sport::Ncaaf];

    /// Lowercase slug used in URLs, config sections and file names.
    pub fn slug(&self) -> &'static str {
        match self {
            Sport::Nba => "nba",
            Sport::Nfl => "nfl",
            Sport::Mlb => "mlb",
            Sport::Nhl => "nhl",
            Sport::Ncaaf => "ncaaf",
        }
    }

    /// Sport key understood by the odds provider.
    pub fn provider_key(&self) -> &'static str {
        match self {
            Sport::Nba => "basketball_nba",
            Sport::Nfl => "americanfootball_nfl",
            Sport::Mlb => "baseball_mlb",
            Sport::Nhl => "icehockey_nhl",
            Sport::Ncaaf => "americanfootball_ncaaf",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sport::Nba => write!(f, "NBA"),
            Sport::Nfl => write!(f, "NFL"),
            Sport::Mlb => write!(f, "MLB"),
            Sport::Nhl => write!(f, "NHL"),
            Sport::Ncaaf => write!(f, "NCAAF"),
        }
    }
}

/// Parse a slug or provider key (case-insensitive).
impl std::str::FromStr for Sport {
    type Err = ConsensusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Sport::ALL
            .iter()
            .copied()
            .find(|sport| sport.slug() == key || sport.provider_key() == key)
            .ok_or_else(|| ConsensusError::UnknownSport(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Admission policy
// ---------------------------------------------------------------------------

/// Per-sport thresholds a proposition must meet to be published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionPolicy {
    /// Minimum bookmakers quoting the proposition (0 = no minimum).
    pub min_bookmakers: usize,
    /// Count only bookmakers quoting the selected side, instead of
    /// distinct bookmakers on either side.
    #[serde(default)]
    pub count_selected_side: bool,
    /// At least one of these must quote the proposition. Empty = no requirement.
    #[serde(default)]
    pub required_sharp_books: Vec<String>,
    /// Size of the ranked output.
    pub max_results: usize,
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Immutable per-sport configuration injected into every engine call.
#[derive(Debug, Clone, PartialEq)]
pub struct SportProfile {
    pub sport: Sport,
    pub weights: WeightingTable,
    pub market_labels: MarketLabelTable,
    pub admission: AdmissionPolicy,
    /// Provider market keys requested per event.
    pub markets: Vec<String>,
    /// Provider regions for bookmaker odds, e.g. `"us,eu"`.
    pub regions: String,
    /// Provider bookmaker keys to request. Empty = every book in `regions`.
    pub bookmakers: Vec<String>,
    /// Fixed bookmaker column layout for tabular export.
    pub bookmaker_columns: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

const FOOTBALL_WEIGHTS: &[(&str, f64)] = &[
    ("Pinnacle", 0.50),
    ("Caesars", 0.20),
    ("BetMGM", 0.20),
    ("DraftKings", 0.05),
    ("FanDuel", 0.05),
];

const FOOTBALL_SHARP_BOOKS: &[&str] = &["Pinnacle", "BetMGM", "Caesars"];

const FOOTBALL_COLUMNS: &[&str] = &["Pinnacle", "Caesars", "BetMGM", "DraftKings", "FanDuel"];

/// US-region books as the provider titles them.
const US_BOOKS: &[&str] = &["DraftKings", "FanDuel", "BetRivers", "BetOnline.ag", "Bovada", "BetMGM"];

impl SportProfile {
    /// Built-in profile for `sport`.
    pub fn defaults(sport: Sport) -> Self {
        match sport {
            Sport::Nfl | Sport::Ncaaf => Self {
                sport,
                weights: WeightingTable::from_pairs(FOOTBALL_WEIGHTS),
                market_labels: MarketLabelTable::from_pairs(markets::FOOTBALL_LABELS),
                admission: AdmissionPolicy {
                    min_bookmakers: 2,
                    count_selected_side: false,
                    required_sharp_books: strings(FOOTBALL_SHARP_BOOKS),
                    max_results: 15,
                },
                markets: if sport == Sport::Nfl {
                    strings(&["player_pass_yds", "player_rush_yds", "player_reception_yds", "player_receptions"])
                } else {
                    strings(&["player_pass_yds", "player_rush_yds"])
                },
                regions: "us,eu".to_string(),
                bookmakers: strings(&["pinnacle", "draftkings", "fanduel", "betmgm", "williamhill_us"]),
                bookmaker_columns: strings(FOOTBALL_COLUMNS),
            },
            Sport::Mlb => Self {
                sport,
                weights: WeightingTable::from_pairs(&[
                    ("Pinnacle", 0.45),
                    ("Caesars", 0.25),
                    ("DraftKings", 0.15),
                    ("FanDuel", 0.15),
                ]),
                market_labels: MarketLabelTable::from_pairs(markets::BASEBALL_LABELS),
                admission: AdmissionPolicy {
                    min_bookmakers: 0,
                    count_selected_side: false,
                    required_sharp_books: Vec::new(),
                    max_results: 15,
                },
                markets: strings(&["pitcher_strikeouts"]),
                regions: "us,eu".to_string(),
                bookmakers: strings(&["pinnacle", "williamhill_us", "draftkings", "fanduel"]),
                bookmaker_columns: strings(&["Pinnacle", "Caesars", "DraftKings", "FanDuel"]),
            },
            Sport::Nhl => Self {
                sport,
                weights: WeightingTable::equal(US_BOOKS),
                market_labels: MarketLabelTable::from_pairs(markets::HOCKEY_LABELS),
                admission: AdmissionPolicy {
                    min_bookmakers: 3,
                    count_selected_side: true,
                    required_sharp_books: Vec::new(),
                    max_results: 20,
                },
                markets: strings(&["player_points"]),
                regions: "us".to_string(),
                bookmakers: Vec::new(),
                bookmaker_columns: strings(US_BOOKS),
            },
            Sport::Nba => Self {
                sport,
                weights: WeightingTable::uniform(),
                market_labels: MarketLabelTable::from_pairs(markets::BASKETBALL_LABELS),
                admission: AdmissionPolicy {
                    min_bookmakers: 0,
                    count_selected_side: false,
                    required_sharp_books: Vec::new(),
                    max_results: 20,
                },
                markets: strings(&["player_points", "player_rebounds"]),
                regions: "us".to_string(),
                bookmakers: Vec::new(),
                bookmaker_columns: strings(US_BOOKS),
            },
        }
    }

    /// Startup validation. Any error here is fatal.
    pub fn validate(&self) -> Result<(), ConsensusError> {
        self.weights
            .validate()
            .map_err(|e| ConsensusError::Config(format!("{}: {e}", self.sport.slug())))?;

        if self.admission.max_results == 0 {
            return Err(ConsensusError::Config(format!(
                "{}: max_results must be at least 1",
                self.sport.slug()
            )));
        }
        if self.markets.is_empty() {
            return Err(ConsensusError::Config(format!(
                "{}: no markets configured",
                self.sport.slug()
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
