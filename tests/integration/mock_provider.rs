//! Mock odds provider for integration testing.
//!
//! Provides a deterministic `OddsProvider` implementation that serves
//! known events, bookmaker quotes and DFS lines from memory, and records
//! every request it receives.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use propline::providers::{OddsProvider, QuoteRequest};
use propline::sports::Sport;
use propline::types::{DfsLine, DfsSite, EventSummary, Quote, Side};

/// In-memory provider. Events, quotes and DFS lines are fully
/// controllable from test code.
#[derive(Default)]
pub struct MockProvider {
    events: Vec<EventSummary>,
    quotes: HashMap<String, Vec<Quote>>,
    dfs_lines: HashMap<String, Vec<DfsLine>>,
    requests: Arc<Mutex<Vec<QuoteRequest>>>,
    /// If set, event listing fails with this message.
    force_error: Arc<Mutex<Option<String>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event with its bookmaker quotes and DFS lines.
    pub fn with_event(mut self, event_id: &str, quotes: Vec<Quote>, dfs_lines: Vec<DfsLine>) -> Self {
        self.events.push(EventSummary {
            id: event_id.to_string(),
            home_team: format!("{event_id} Home"),
            away_team: format!("{event_id} Away"),
            commence_time: None,
        });
        self.quotes.insert(event_id.to_string(), quotes);
        self.dfs_lines.insert(event_id.to_string(), dfs_lines);
        self
    }

    /// Force event listing to fail.
    pub fn set_error(&self, msg: &str) {
        *self.force_error.lock().unwrap() = Some(msg.to_string());
    }

    /// Every quote/DFS request received so far.
    pub fn requests(&self) -> Vec<QuoteRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl OddsProvider for MockProvider {
    async fn fetch_events(&self, _sport: Sport) -> Result<Vec<EventSummary>> {
        if let Some(msg) = self.force_error.lock().unwrap().as_ref() {
            return Err(anyhow!("{msg}"));
        }
        Ok(self.events.clone())
    }

    async fn fetch_quotes(&self, request: &QuoteRequest) -> Result<Vec<Quote>> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self
            .quotes
            .get(&request.event_id)
            .into_iter()
            .flatten()
            .filter(|q| request.matches_player(&q.player_name))
            .cloned()
            .collect())
    }

    async fn fetch_dfs_lines(&self, request: &QuoteRequest) -> Result<Vec<DfsLine>> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self
            .dfs_lines
            .get(&request.event_id)
            .into_iter()
            .flatten()
            .filter(|l| request.matches_player(&l.player_name))
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Fixture helpers
// ---------------------------------------------------------------------------

/// Over and under quotes from one bookmaker.
pub fn two_way(player: &str, market: &str, line: f64, book: &str, over: f64, under: f64) -> Vec<Quote> {
    [(Side::Over, over), (Side::Under, under)]
        .into_iter()
        .map(|(side, price)| Quote {
            player_name: player.to_string(),
            market_code: market.to_string(),
            line,
            side,
            price,
            bookmaker: book.to_string(),
        })
        .collect()
}

pub fn dfs(site: DfsSite, player: &str, market: &str, line: f64) -> DfsLine {
    DfsLine {
        site,
        player_name: player.to_string(),
        market_code: market.to_string(),
        line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_serves_events() {
        let provider = MockProvider::new().with_event("evt1", Vec::new(), Vec::new());
        let events = provider.fetch_events(Sport::Nba).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].matchup(), "evt1 Home vs evt1 Away");
    }

    #[tokio::test]
    async fn test_mock_forced_error() {
        let provider = MockProvider::new();
        provider.set_error("quota exceeded");
        let err = provider.fetch_events(Sport::Nba).await.unwrap_err();
        assert!(err.to_string().contains("quota"));
    }

    #[tokio::test]
    async fn test_mock_filters_players_and_records_requests() {
        let mut quotes = two_way("LeBron James", "player_points", 25.5, "FanDuel", 1.9, 1.9);
        quotes.extend(two_way("Anthony Davis", "player_points", 24.5, "FanDuel", 1.9, 1.9));
        let provider = MockProvider::new().with_event("evt1", quotes, Vec::new());

        let request = QuoteRequest {
            sport: Sport::Nba,
            event_id: "evt1".into(),
            markets: vec!["player_points".into()],
            regions: "us".into(),
            bookmakers: Vec::new(),
            player_filter: Some("lebron".into()),
        };
        let quotes = provider.fetch_quotes(&request).await.unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(provider.requests().len(), 1);
    }
}
