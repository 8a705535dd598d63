//! Market code → display label tables.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Label returned for any market code missing from the table.
pub const UNKNOWN_MARKET: &str = "unknown";

/// Pure lookup from raw provider market code to a human-readable label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketLabelTable {
    labels: HashMap<String, String>,
}

impl MarketLabelTable {
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            labels: pairs
                .iter()
                .map(|(code, label)| (code.to_lowercase(), label.to_string()))
                .collect(),
        }
    }

    /// Display label for `code` (matched lowercase), or `"unknown"`.
    pub fn label_for(&self, code: &str) -> String {
        self.labels
            .get(&code.to_lowercase())
            .cloned()
            .unwrap_or_else(|| UNKNOWN_MARKET.to_string())
    }

    /// Add or replace entries from another table.
    pub fn extend(&mut self, other: &MarketLabelTable) {
        for (code, label) in &other.labels {
            self.labels.insert(code.to_lowercase(), label.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Built-in tables
// ---------------------------------------------------------------------------

pub const FOOTBALL_LABELS: &[(&str, &str)] = &[
    ("player_pass_attempts", "Pass Attempts"),
    ("player_pass_completions", "Pass Completions"),
    ("player_pass_interceptions", "Pass Ints"),
    ("player_pass_longest_completion", "Longest Completion"),
    ("player_pass_yds", "Pass Yards"),
    ("player_pass_tds", "Pass TDs"),
    ("player_reception_longest", "Longest Reception"),
    ("player_receptions", "Receptions"),
    ("player_reception_yds", "Receiving Yards"),
    ("player_rush_attempts", "Rush Attempts"),
    ("player_rush_longest", "Longest Rush"),
    ("player_rush_reception_tds", "Rush+Rec TDs"),
    ("player_rush_reception_yds", "Rush+Rec Yards"),
    ("player_rush_yds", "Rushing Yards"),
    ("player_sacks", "Sacks"),
    ("player_solo_tackles", "Solo Tackles"),
    ("player_tackles_assists", "Tackles+Assists"),
    ("player_kicking_points", "Kicking Points"),
    ("player_field_goals", "Field Goals"),
    ("player_defensive_interceptions", "Def Ints"),
    ("player_assists", "Assists"),
    ("player_pass_yds_q1", "Pass Yards 1Q"),
];

pub const BASKETBALL_LABELS: &[(&str, &str)] = &[
    ("player_points", "pts"),
    ("player_rebounds", "rebs"),
    ("player_assists", "asts"),
    ("player_points_rebounds_assists", "pra"),
    ("player_points_rebounds", "p+r"),
    ("player_points_assists", "p+a"),
    ("player_rebounds_assists", "r+a"),
    ("player_blocks", "blks"),
    ("player_steals", "stls"),
    ("player_blocks_steals", "blks+stls"),
    ("player_threes", "threes"),
    ("player_turnovers", "to"),
    ("player_points_q1", "pts_q1"),
    ("player_rebounds_q1", "rebs_q1"),
    ("player_assists_q1", "asts_q1"),
    ("player_field_goals", "fg"),
    ("player_frees_made", "ftm"),
    ("player_frees_attempts", "fta"),
];

pub const BASEBALL_LABELS: &[(&str, &str)] = &[
    ("pitcher_outs", "Outs"),
    ("pitcher_earned_runs", "Earned Runs"),
    ("pitcher_walks", "Pitcher Walks"),
    ("pitcher_strikeouts", "Pitcher Strikeouts"),
    ("pitcher_hits_allowed", "Hits Allowed"),
    ("batter_stolen_bases", "Stolen Bases"),
    ("batter_strikeouts", "Batter Strikeouts"),
    ("batter_walks", "Batter Walks"),
    ("batter_triples", "Triples"),
    ("batter_doubles", "Doubles"),
    ("batter_singles", "Singles"),
    ("batter_hits", "Hits"),
    ("batter_hits_runs_rbis", "Hits+Runs+RBIs"),
    ("batter_runs_scored", "Runs Scored"),
    ("batter_rbis", "RBIs"),
    ("batter_total_bases", "Total Bases"),
    ("batter_home_runs", "Home Runs"),
];

pub const HOCKEY_LABELS: &[(&str, &str)] = &[
    ("player_points", "Points"),
    ("player_assists", "Assists"),
    ("player_blocked_shots", "Blocked Shots"),
    ("player_shots_on_goal", "Shots on Goal"),
    ("player_goals", "Goals"),
    ("player_total_saves", "Saves"),
];
