//! Player-props service: events → collection → consensus → export.

pub mod collector;

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::export::TabularExporter;
use crate::providers::OddsProvider;
use crate::sports::{Sport, SportProfile};
use crate::strategy::ConsensusEngine;
use crate::types::{ConsensusError, ConsensusResult, DfsSite, EventSummary};
use collector::PropCollector;

/// Ranked props for one sport, one list per DFS site.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PropsReport {
    pub sport: Option<Sport>,
    pub underdog_props: Vec<ConsensusResult>,
    pub prizepicks_props: Vec<ConsensusResult>,
}

impl PropsReport {
    fn empty(sport: Sport) -> Self {
        Self {
            sport: Some(sport),
            ..Default::default()
        }
    }

    pub fn for_site(&self, site: DfsSite) -> &[ConsensusResult] {
        match site {
            DfsSite::Underdog => &self.underdog_props,
            DfsSite::PrizePicks => &self.prizepicks_props,
        }
    }

    fn set_site(&mut self, site: DfsSite, results: Vec<ConsensusResult>) {
        match site {
            DfsSite::Underdog => self.underdog_props = results,
            DfsSite::PrizePicks => self.prizepicks_props = results,
        }
    }
}

/// Shared, read-only service behind every request.
pub struct PropService {
    provider: Arc<dyn OddsProvider>,
    profiles: HashMap<Sport, SportProfile>,
    dfs_regions: String,
    exporter: Option<TabularExporter>,
}

impl PropService {
    pub fn new(
        provider: Arc<dyn OddsProvider>,
        profiles: HashMap<Sport, SportProfile>,
        dfs_regions: impl Into<String>,
        exporter: Option<TabularExporter>,
    ) -> Self {
        Self {
            provider,
            profiles,
            dfs_regions: dfs_regions.into(),
            exporter,
        }
    }

    /// Profile of an enabled sport.
    pub fn profile(&self, sport: Sport) -> Result<&SportProfile, ConsensusError> {
        self.profiles
            .get(&sport)
            .ok_or_else(|| ConsensusError::UnknownSport(sport.slug().to_string()))
    }

    /// Enabled sports in declaration order.
    pub fn sports(&self) -> Vec<Sport> {
        Sport::ALL
            .iter()
            .copied()
            .filter(|s| self.profiles.contains_key(s))
            .collect()
    }

    /// Upcoming events. Provider failures propagate.
    pub async fn events(&self, sport: Sport) -> Result<Vec<EventSummary>> {
        self.profile(sport)?;
        self.provider.fetch_events(sport).await
    }

    /// Collect, price and rank every DFS-posted prop for `sport`.
    ///
    /// An event listing failure yields an empty report rather than an
    /// error. Export failures are logged and never fail the request.
    pub async fn player_props(&self, sport: Sport, player_filter: Option<&str>) -> Result<PropsReport> {
        let profile = self.profile(sport)?;

        let events = match self.provider.fetch_events(sport).await {
            Ok(events) => events,
            Err(e) => {
                warn!(sport = %sport, error = %e, "Event listing failed, returning empty report");
                return Ok(PropsReport::empty(sport));
            }
        };

        let groups = PropCollector::new(self.provider.as_ref(), &self.dfs_regions)
            .collect(profile, &events, player_filter)
            .await;

        let engine = ConsensusEngine::new(profile);
        let mut report = PropsReport::empty(sport);

        for site in DfsSite::ALL {
            let outcome = engine.run(groups.get(*site));
            let skipped = outcome.decisions.iter().filter(|d| !d.is_selected()).count();
            info!(
                sport = %sport,
                site = %site,
                published = outcome.results.len(),
                skipped,
                "Site props ranked"
            );

            if let Some(exporter) = &self.exporter {
                if let Err(e) = exporter.export(sport, *site, &profile.bookmaker_columns, &outcome.results) {
                    warn!(sport = %sport, site = %site, error = %e, "Export failed");
                }
            }

            report.set_site(*site, outcome.results);
        }

        Ok(report)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
