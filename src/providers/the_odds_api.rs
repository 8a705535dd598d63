//! The Odds API (v4) integration.
//!
//! API docs: https://the-odds-api.com/liveapi/guides/v4/
//! Base URL: https://api.the-odds-api.com/v4
//! Auth: `apiKey` query parameter.
//!
//! Player props are only served per event, so every proposition fetch is
//! one `/events/{id}/odds` call. Prices are always requested in decimal.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{OddsProvider, QuoteRequest};
use crate::sports::Sport;
use crate::types::{ConsensusError, DfsLine, DfsSite, EventSummary, Quote, Side};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

pub const DEFAULT_BASE_URL: &str = "https://api.the-odds-api.com/v4";
const PROVIDER_NAME: &str = "the-odds-api";
const ODDS_FORMAT: &str = "decimal";

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ApiEvent {
    id: String,
    #[serde(default)]
    home_team: String,
    #[serde(default)]
    away_team: String,
    #[serde(default)]
    commence_time: Option<DateTime<Utc>>,
}

/// `/events/{id}/odds` body. Only the fields we read.
#[derive(Debug, Deserialize)]
struct ApiEventOdds {
    #[serde(default)]
    bookmakers: Vec<ApiBookmaker>,
}

#[derive(Debug, Deserialize)]
struct ApiBookmaker {
    key: String,
    title: String,
    #[serde(default)]
    markets: Vec<ApiMarket>,
}

#[derive(Debug, Deserialize)]
struct ApiMarket {
    key: String,
    #[serde(default)]
    outcomes: Vec<ApiOutcome>,
}

/// A prop outcome: `name` is the side, `description` the player.
#[derive(Debug, Deserialize)]
struct ApiOutcome {
    name: String,
    #[serde(default)]
    description: Option<String>,
    price: f64,
    #[serde(default)]
    point: Option<f64>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Flatten one event's odds into quotes, applying the request's bookmaker
/// and player filters. Outcomes with no player, no line, or a side label
/// other than Over/Under are dropped.
fn quotes_from_event(odds: ApiEventOdds, request: &QuoteRequest) -> Vec<Quote> {
    let mut quotes = Vec::new();

    for bookmaker in odds.bookmakers {
        if !request.matches_bookmaker(&bookmaker.key) {
            continue;
        }
        for market in bookmaker.markets {
            for outcome in market.outcomes {
                let (Some(player_name), Some(line)) = (outcome.description, outcome.point) else {
                    continue;
                };
                if !request.matches_player(&player_name) {
                    continue;
                }
                let Ok(side) = outcome.name.parse::<Side>() else {
                    debug!(bookmaker = %bookmaker.title, label = %outcome.name, "Skipping non over/under outcome");
                    continue;
                };
                quotes.push(Quote {
                    player_name,
                    market_code: market.key.clone(),
                    line,
                    side,
                    price: outcome.price,
                    bookmaker: bookmaker.title.clone(),
                });
            }
        }
    }

    quotes
}

/// Extract DFS-site lines. Sites post only the over, so under outcomes
/// are ignored.
fn dfs_lines_from_event(odds: ApiEventOdds, request: &QuoteRequest) -> Vec<DfsLine> {
    let mut lines = Vec::new();

    for bookmaker in odds.bookmakers {
        let Some(site) =
            DfsSite::from_bookmaker(&bookmaker.key).or_else(|| DfsSite::from_bookmaker(&bookmaker.title))
        else {
            continue;
        };
        for market in bookmaker.markets {
            for outcome in market.outcomes {
                let (Some(player_name), Some(line)) = (outcome.description, outcome.point) else {
                    continue;
                };
                if !matches!(outcome.name.parse::<Side>(), Ok(Side::Over)) {
                    continue;
                }
                if !request.matches_player(&player_name) {
                    continue;
                }
                lines.push(DfsLine {
                    site,
                    player_name,
                    market_code: market.key.clone(),
                    line,
                });
            }
        }
    }

    lines
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct TheOddsApiClient {
    http: Client,
    base_url: String,
    api_key: SecretString,
}

impl TheOddsApiClient {
    pub fn new(base_url: impl Into<String>, api_key: SecretString, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("PROPLINE/0.1.0 (props-consensus)")
            .build()
            .context("Failed to build HTTP client for The Odds API")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn events_url(&self, sport: Sport) -> String {
        format!("{}/sports/{}/events", self.base_url, sport.provider_key())
    }

    fn event_odds_url(&self, request: &QuoteRequest) -> String {
        format!(
            "{}/sports/{}/events/{}/odds",
            self.base_url,
            request.sport.provider_key(),
            urlencoding::encode(&request.event_id),
        )
    }

    /// GET and decode, mapping non-2xx responses to a fetch error.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        debug!(url = %url, "Fetching from The Odds API");

        let resp = self
            .http
            .get(url)
            .query(&[("apiKey", self.api_key.expose_secret().as_str())])
            .query(query)
            .send()
            .await
            .context("The Odds API request failed")?;

        if let Some(remaining) = resp.headers().get("x-requests-remaining") {
            debug!(remaining = ?remaining, "The Odds API quota");
        }

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ConsensusError::Fetch {
                provider: PROVIDER_NAME.to_string(),
                message: format!("{status}: {body}"),
            }
            .into());
        }

        resp.json::<T>()
            .await
            .context("Failed to parse The Odds API response")
    }

    async fn fetch_event_odds(&self, request: &QuoteRequest) -> Result<ApiEventOdds> {
        let markets = request.markets.join(",");
        self.get_json(
            &self.event_odds_url(request),
            &[
                ("regions", request.regions.as_str()),
                ("markets", markets.as_str()),
                ("oddsFormat", ODDS_FORMAT),
            ],
        )
        .await
    }
}

#[async_trait]
impl OddsProvider for TheOddsApiClient {
    async fn fetch_events(&self, sport: Sport) -> Result<Vec<EventSummary>> {
        let response: Vec<ApiEvent> = self.get_json(&self.events_url(sport), &[]).await?;

        let events: Vec<EventSummary> = response
            .into_iter()
            .map(|e| EventSummary {
                id: e.id,
                home_team: e.home_team,
                away_team: e.away_team,
                commence_time: e.commence_time,
            })
            .collect();

        debug!(sport = %sport, count = events.len(), "Fetched events");
        Ok(events)
    }

    async fn fetch_quotes(&self, request: &QuoteRequest) -> Result<Vec<Quote>> {
        let odds = self
            .fetch_event_odds(request)
            .await
            .with_context(|| format!("Fetching quotes for event {}", request.event_id))?;

        let quotes = quotes_from_event(odds, request);
        if quotes.is_empty() {
            warn!(event = %request.event_id, "No bookmaker quotes returned");
        }
        Ok(quotes)
    }

    async fn fetch_dfs_lines(&self, request: &QuoteRequest) -> Result<Vec<DfsLine>> {
        let odds = self
            .fetch_event_odds(request)
            .await
            .with_context(|| format!("Fetching DFS lines for event {}", request.event_id))?;

        Ok(dfs_lines_from_event(odds, request))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
