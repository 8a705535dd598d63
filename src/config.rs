//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Secrets (API keys) are referenced by env-var name in the config and
//! resolved at runtime via `std::env::var`.
//!
//! Every `[sports.<slug>]` section is optional and only overrides the
//! fields it names; everything else comes from `SportProfile::defaults`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use tracing::info;

use crate::providers::the_odds_api::DEFAULT_BASE_URL;
use crate::sports::markets::MarketLabelTable;
use crate::sports::weights::WeightingTable;
use crate::sports::{Sport, SportProfile};
use crate::types::ConsensusError;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub odds_api: OddsApiConfig,
    #[serde(default)]
    pub export: ExportConfig,
    /// Keyed by sport slug.
    #[serde(default)]
    pub sports: HashMap<String, SportOverrides>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8000 }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OddsApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Region used for DFS-site lines.
    #[serde(default = "default_dfs_regions")]
    pub dfs_regions: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_key_env() -> String {
    "ODDS_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_dfs_regions() -> String {
    "us_dfs".to_string()
}

impl Default for OddsApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            dfs_regions: default_dfs_regions(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    pub enabled: bool,
    pub directory: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: "exports".to_string(),
        }
    }
}

/// Partial per-sport profile. `None` keeps the built-in value.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SportOverrides {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub markets: Option<Vec<String>>,
    #[serde(default)]
    pub regions: Option<String>,
    #[serde(default)]
    pub bookmakers: Option<Vec<String>>,
    #[serde(default)]
    pub weights: Option<WeightingTable>,
    /// Merged into the built-in label table.
    #[serde(default)]
    pub market_labels: Option<MarketLabelTable>,
    #[serde(default)]
    pub min_bookmakers: Option<usize>,
    /// Apply `min_bookmakers` to books quoting the selected side only.
    #[serde(default)]
    pub count_selected_side: Option<bool>,
    #[serde(default)]
    pub sharp_books: Option<Vec<String>>,
    #[serde(default)]
    pub max_results: Option<usize>,
    #[serde(default)]
    pub bookmaker_columns: Option<Vec<String>>,
}

impl SportOverrides {
    fn apply(&self, profile: &mut SportProfile) {
        if let Some(markets) = &self.markets {
            profile.markets = markets.clone();
        }
        if let Some(regions) = &self.regions {
            profile.regions = regions.clone();
        }
        if let Some(bookmakers) = &self.bookmakers {
            profile.bookmakers = bookmakers.clone();
        }
        if let Some(weights) = &self.weights {
            profile.weights = weights.clone();
        }
        if let Some(labels) = &self.market_labels {
            profile.market_labels.extend(labels);
        }
        if let Some(min) = self.min_bookmakers {
            profile.admission.min_bookmakers = min;
        }
        if let Some(selected_only) = self.count_selected_side {
            profile.admission.count_selected_side = selected_only;
        }
        if let Some(sharp) = &self.sharp_books {
            profile.admission.required_sharp_books = sharp.clone();
        }
        if let Some(max) = self.max_results {
            profile.admission.max_results = max;
        }
        if let Some(columns) = &self.bookmaker_columns {
            profile.bookmaker_columns = columns.clone();
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml_str(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Resolve an environment variable name to its value.
    /// Useful for loading secrets referenced in the config.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }

    /// Built-in profiles with config overrides applied, minus disabled
    /// sports. Every returned profile has passed validation.
    pub fn sport_profiles(&self) -> Result<HashMap<Sport, SportProfile>, ConsensusError> {
        for key in self.sports.keys() {
            key.parse::<Sport>()
                .map_err(|_| ConsensusError::Config(format!("unknown sport section [sports.{key}]")))?;
        }

        let mut profiles = HashMap::new();
        for sport in Sport::ALL {
            let mut profile = SportProfile::defaults(*sport);
            if let Some(overrides) = self.sports.get(sport.slug()) {
                if overrides.enabled == Some(false) {
                    info!(sport = %sport, "Sport disabled in config");
                    continue;
                }
                overrides.apply(&mut profile);
            }
            profile.validate()?;
            profiles.insert(*sport, profile);
        }
        Ok(profiles)
    }
}
