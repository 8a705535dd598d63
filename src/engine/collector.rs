//! Per-event prop collection.
//!
//! Fetches bookmaker quotes and DFS-site lines for every event
//! concurrently, then keeps only the propositions a DFS site actually
//! posts. Each surviving `(player, market, line)` becomes one
//! `PropGroup`, bucketed by the site that posted it.

use futures::future::join_all;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::providers::{OddsProvider, QuoteRequest};
use crate::sports::SportProfile;
use crate::types::{DfsLine, DfsSite, EventSummary, PropGroup, Quote};

/// Proposition groups keyed by the DFS site that posted the line.
#[derive(Debug, Clone, Default)]
pub struct SiteGroups {
    by_site: HashMap<DfsSite, Vec<PropGroup>>,
}

impl SiteGroups {
    pub fn get(&self, site: DfsSite) -> &[PropGroup] {
        self.by_site.get(&site).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total(&self) -> usize {
        self.by_site.values().map(Vec::len).sum()
    }

    fn merge(&mut self, other: SiteGroups) {
        for (site, groups) in other.by_site {
            self.by_site.entry(site).or_default().extend(groups);
        }
    }
}

/// Build per-site groups by matching DFS lines against bookmaker quotes.
///
/// A DFS line with no bookmaker quote on the same player, market and line
/// is dropped. Repeated lines from the same site collapse into one group.
pub fn match_dfs_lines(quotes: &[Quote], dfs_lines: &[DfsLine]) -> SiteGroups {
    let mut out = SiteGroups::default();

    for dfs in dfs_lines {
        let groups = out.by_site.entry(dfs.site).or_default();
        let seen = groups.iter().any(|g| {
            g.player_name == dfs.player_name
                && g.market_code == dfs.market_code
                && g.line.to_bits() == dfs.line.to_bits()
        });
        if seen {
            continue;
        }

        let matching: Vec<Quote> = quotes
            .iter()
            .filter(|q| {
                q.player_name == dfs.player_name
                    && q.market_code == dfs.market_code
                    && q.line.to_bits() == dfs.line.to_bits()
            })
            .cloned()
            .collect();

        if matching.is_empty() {
            debug!(
                site = %dfs.site,
                player = %dfs.player_name,
                market = %dfs.market_code,
                line = dfs.line,
                "DFS line has no bookmaker quotes"
            );
            continue;
        }

        let mut group = PropGroup::new(dfs.player_name.clone(), dfs.market_code.clone(), dfs.line);
        group.quotes = matching;
        groups.push(group);
    }

    out
}

pub struct PropCollector<'a> {
    provider: &'a dyn OddsProvider,
    dfs_regions: &'a str,
}

impl<'a> PropCollector<'a> {
    pub fn new(provider: &'a dyn OddsProvider, dfs_regions: &'a str) -> Self {
        Self { provider, dfs_regions }
    }

    /// Collect groups for every event. Per-event failures are logged and
    /// the event is skipped.
    pub async fn collect(
        &self,
        profile: &SportProfile,
        events: &[EventSummary],
        player_filter: Option<&str>,
    ) -> SiteGroups {
        let per_event = join_all(
            events
                .iter()
                .map(|event| self.collect_event(profile, event, player_filter)),
        )
        .await;

        let mut all = SiteGroups::default();
        for groups in per_event {
            all.merge(groups);
        }

        info!(
            sport = %profile.sport,
            events = events.len(),
            groups = all.total(),
            "Prop collection complete"
        );
        all
    }

    async fn collect_event(
        &self,
        profile: &SportProfile,
        event: &EventSummary,
        player_filter: Option<&str>,
    ) -> SiteGroups {
        let books_request = QuoteRequest {
            sport: profile.sport,
            event_id: event.id.clone(),
            markets: profile.markets.clone(),
            regions: profile.regions.clone(),
            bookmakers: profile.bookmakers.clone(),
            player_filter: player_filter.map(String::from),
        };
        let dfs_request = QuoteRequest {
            regions: self.dfs_regions.to_string(),
            bookmakers: Vec::new(),
            ..books_request.clone()
        };

        let (quotes, dfs_lines) = tokio::join!(
            self.provider.fetch_quotes(&books_request),
            self.provider.fetch_dfs_lines(&dfs_request),
        );

        let quotes = match quotes {
            Ok(q) if !q.is_empty() => q,
            Ok(_) => {
                warn!(event = %event.id, matchup = %event.matchup(), "No bookmaker quotes, skipping event");
                return SiteGroups::default();
            }
            Err(e) => {
                warn!(event = %event.id, error = %e, "Quote fetch failed, skipping event");
                return SiteGroups::default();
            }
        };

        let dfs_lines = dfs_lines.unwrap_or_else(|e| {
            warn!(event = %event.id, error = %e, "DFS line fetch failed");
            Vec::new()
        });

        debug!(
            event = %event.id,
            quotes = quotes.len(),
            dfs_lines = dfs_lines.len(),
            "Event fetched"
        );

        match_dfs_lines(&quotes, &dfs_lines)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
