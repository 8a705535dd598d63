//! PROPLINE — consensus fair pricing for player props
//!
//! Entry point. Loads configuration, initialises structured logging,
//! validates the sport profiles, and serves the HTTP API until ctrl-c.

use anyhow::{Context, Result};
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use propline::api;
use propline::config;
use propline::engine::PropService;
use propline::export::TabularExporter;
use propline::providers::the_odds_api::TheOddsApiClient;

const BANNER: &str = r#"
 ____  ____   ___  ____  _     ___ _   _ _____
|  _ \|  _ \ / _ \|  _ \| |   |_ _| \ | | ____|
| |_) | |_) | | | | |_) | |    | ||  \| |  _|
|  __/|  _ <| |_| |  __/| |___ | || |\  | |___
|_|   |_| \_\\___/|_|   |_____|___|_| \_|_____|

  Player-prop consensus pricing
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let config_path = std::env::var("PROPLINE_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let cfg = config::AppConfig::load(&config_path)?;

    init_logging();

    println!("{BANNER}");

    let profiles = cfg
        .sport_profiles()
        .context("Invalid sport configuration")?;
    let mut enabled: Vec<&str> = profiles.keys().map(|s| s.slug()).collect();
    enabled.sort_unstable();
    info!(
        sports = ?enabled,
        port = cfg.server.port,
        export = cfg.export.enabled,
        "PROPLINE starting up"
    );

    let api_key = config::AppConfig::resolve_env(&cfg.odds_api.api_key_env)?;
    let provider = TheOddsApiClient::new(
        cfg.odds_api.base_url.clone(),
        SecretString::new(api_key),
        Duration::from_secs(cfg.odds_api.timeout_secs),
    )?;

    let exporter = cfg
        .export
        .enabled
        .then(|| TabularExporter::new(&cfg.export.directory));

    let service = PropService::new(
        Arc::new(provider),
        profiles,
        cfg.odds_api.dfs_regions.clone(),
        exporter,
    );

    api::serve(Arc::new(service), cfg.server.port).await?;

    info!("PROPLINE shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("propline=info"));

    let json_logging = std::env::var("PROPLINE_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
