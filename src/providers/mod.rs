//! Odds provider integrations.
//!
//! Defines the `OddsProvider` trait the collector fetches through, and the
//! The Odds API implementation used in production.

pub mod the_odds_api;

use anyhow::Result;
use async_trait::async_trait;

use crate::sports::Sport;
use crate::types::{DfsLine, EventSummary, Quote};

/// What to fetch for one event.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    pub sport: Sport,
    pub event_id: String,
    /// Provider market keys.
    pub markets: Vec<String>,
    /// Provider regions, e.g. `"us,eu"` or `"us_dfs"`.
    pub regions: String,
    /// Provider bookmaker keys to keep. Empty keeps every bookmaker.
    pub bookmakers: Vec<String>,
    /// Case-insensitive substring filter on player name.
    pub player_filter: Option<String>,
}

impl QuoteRequest {
    /// Whether `player_name` passes the optional name filter.
    pub fn matches_player(&self, player_name: &str) -> bool {
        match &self.player_filter {
            Some(filter) => player_name.to_lowercase().contains(&filter.to_lowercase()),
            None => true,
        }
    }

    /// Whether a provider bookmaker key passes the bookmaker filter.
    pub fn matches_bookmaker(&self, bookmaker_key: &str) -> bool {
        self.bookmakers.is_empty() || self.bookmakers.iter().any(|b| b == bookmaker_key)
    }
}

/// Abstraction over remote odds sources.
///
/// Implementations return fully collected snapshots; the engine never sees
/// partial results.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OddsProvider: Send + Sync {
    /// Upcoming events for a sport.
    async fn fetch_events(&self, sport: Sport) -> Result<Vec<EventSummary>>;

    /// Bookmaker quotes for one event, normalized to decimal odds.
    async fn fetch_quotes(&self, request: &QuoteRequest) -> Result<Vec<Quote>>;

    /// DFS-site lines for one event (over side only).
    async fn fetch_dfs_lines(&self, request: &QuoteRequest) -> Result<Vec<DfsLine>>;
}
