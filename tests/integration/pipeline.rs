//! End-to-end pipeline tests through `PropService` and the HTTP router.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

use propline::api::build_router;
use propline::config::AppConfig;
use propline::engine::PropService;
use propline::export::TabularExporter;
use propline::sports::{Sport, SportProfile};
use propline::types::{DfsSite, Side};

use crate::mock_provider::{dfs, two_way, MockProvider};

fn service_with(provider: MockProvider, config: &str, exporter: Option<TabularExporter>) -> PropService {
    let profiles = AppConfig::from_toml_str(config).unwrap().sport_profiles().unwrap();
    PropService::new(Arc::new(provider), profiles, "us_dfs", exporter)
}

fn james_cook_provider() -> MockProvider {
    let mut quotes = two_way("James Cook", "player_rush_yds", 55.5, "BookA", 1.90, 2.00);
    quotes.extend(two_way("James Cook", "player_rush_yds", 55.5, "BookB", 2.10, 1.85));
    MockProvider::new().with_event(
        "evt1",
        quotes,
        vec![dfs(DfsSite::Underdog, "James Cook", "player_rush_yds", 55.5)],
    )
}

const TWO_BOOK_NFL: &str = r#"
    [sports.nfl]
    min_bookmakers = 0
    sharp_books = []

    [sports.nfl.weights]
    BookA = 0.6
    BookB = 0.4
"#;

#[tokio::test]
async fn test_weighted_consensus_regression() {
    let service = service_with(james_cook_provider(), TWO_BOOK_NFL, None);
    let report = service.player_props(Sport::Nfl, None).await.unwrap();

    assert!(report.prizepicks_props.is_empty());
    assert_eq!(report.underdog_props.len(), 1);

    let prop = &report.underdog_props[0];
    assert_eq!(prop.player_name, "James Cook");
    assert_eq!(prop.market_label, "Rushing Yards");
    assert_eq!(prop.line, 55.5);
    assert_eq!(prop.selected_side, Side::Under);
    assert_eq!(prop.fair_price_american, -102);
    assert_eq!(prop.implied_probability, 50.5);

    let books: Vec<(&str, i64)> = prop
        .contributing_quotes
        .iter()
        .map(|q| (q.bookmaker.as_str(), q.american_price))
        .collect();
    assert_eq!(books, vec![("BookA", 100), ("BookB", -118)]);
}

#[tokio::test]
async fn test_default_nfl_policy_rejects_unweighted_books() {
    // BookA/BookB are not in the football table and neither is sharp.
    let service = service_with(james_cook_provider(), "", None);
    let report = service.player_props(Sport::Nfl, None).await.unwrap();
    assert!(report.underdog_props.is_empty());
}

#[tokio::test]
async fn test_ranking_spans_events_and_truncates() {
    let provider = MockProvider::new()
        .with_event(
            "evt1",
            two_way("Low", "player_points", 20.5, "DraftKings", 1.85, 1.95),
            vec![dfs(DfsSite::PrizePicks, "Low", "player_points", 20.5)],
        )
        .with_event(
            "evt2",
            [
                two_way("High", "player_points", 30.5, "DraftKings", 1.35, 3.20),
                two_way("Mid", "player_rebounds", 9.5, "FanDuel", 1.60, 2.40),
            ]
            .concat(),
            vec![
                dfs(DfsSite::PrizePicks, "High", "player_points", 30.5),
                dfs(DfsSite::PrizePicks, "Mid", "player_rebounds", 9.5),
            ],
        );

    let service = service_with(provider, "[sports.nba]\nmax_results = 2\n", None);
    let report = service.player_props(Sport::Nba, None).await.unwrap();

    let names: Vec<&str> = report
        .prizepicks_props
        .iter()
        .map(|p| p.player_name.as_str())
        .collect();
    assert_eq!(names, vec!["High", "Mid"]);
    assert!(report.prizepicks_props[0].implied_probability >= report.prizepicks_props[1].implied_probability);
    assert_eq!(report.prizepicks_props[1].market_label, "rebs");
    assert!(report.prizepicks_props.iter().all(|p| p.selected_side == Side::Over));
}

#[tokio::test]
async fn test_player_filter_reaches_provider() {
    let provider = Arc::new(james_cook_provider());
    let profiles = AppConfig::from_toml_str(TWO_BOOK_NFL).unwrap().sport_profiles().unwrap();
    let service = PropService::new(provider.clone(), profiles, "us_dfs", None);

    let report = service.player_props(Sport::Nfl, Some("allen")).await.unwrap();
    assert!(report.underdog_props.is_empty());

    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.player_filter.as_deref() == Some("allen")));
    assert!(requests.iter().any(|r| r.regions == "us_dfs"));
}

#[tokio::test]
async fn test_export_uses_profile_columns() {
    let dir = std::env::temp_dir().join(format!("propline-it-{}", uuid::Uuid::new_v4()));
    let config = r#"
        [sports.nfl]
        min_bookmakers = 0
        sharp_books = []
        bookmaker_columns = ["BookA", "Pinnacle", "BookB"]

        [sports.nfl.weights]
        BookA = 0.6
        BookB = 0.4
    "#;
    let service = service_with(james_cook_provider(), config, Some(TabularExporter::new(&dir)));
    service.player_props(Sport::Nfl, None).await.unwrap();

    let csv = std::fs::read_to_string(dir.join("nfl_underdog_props.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Player Name,Lean,Prop Line,Market,BookA,Pinnacle,BookB,Fair Probability");
    assert_eq!(lines[1], "James Cook,Under,55.5,Rushing Yards,100,,-118,50.5");
    assert!(dir.join("nfl_prizepicks_props.csv").exists());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_router_serves_props_and_reports_provider_failure() {
    let app = build_router(Arc::new(service_with(james_cook_provider(), TWO_BOOK_NFL, None)));
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/nfl/player-props?player_name=cook")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["sport"], "nfl");
    assert_eq!(json["underdog_props"][0]["fair_price_american"], -102);

    let failing = MockProvider::new();
    failing.set_error("HTTP 401");
    let profiles = HashMap::from([(Sport::Mlb, SportProfile::defaults(Sport::Mlb))]);
    let app = build_router(Arc::new(PropService::new(Arc::new(failing), profiles, "us_dfs", None)));
    let resp = app
        .oneshot(Request::builder().uri("/api/mlb/events").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_default_hockey_profile_prices_offshore_books() {
    let quotes = [
        two_way("David Pastrnak", "player_points", 0.5, "BetRivers", 1.65, 2.20),
        two_way("David Pastrnak", "player_points", 0.5, "Bovada", 1.62, 2.25),
        two_way("David Pastrnak", "player_points", 0.5, "BetOnline.ag", 1.67, 2.15),
    ]
    .concat();
    let provider = MockProvider::new().with_event(
        "evt1",
        quotes,
        vec![dfs(DfsSite::PrizePicks, "David Pastrnak", "player_points", 0.5)],
    );
    let dir = std::env::temp_dir().join(format!("propline-it-{}", uuid::Uuid::new_v4()));
    let service = service_with(provider, "", Some(TabularExporter::new(&dir)));

    let report = service.player_props(Sport::Nhl, None).await.unwrap();
    assert_eq!(report.prizepicks_props.len(), 1);
    assert_eq!(report.prizepicks_props[0].selected_side, Side::Over);
    assert_eq!(report.prizepicks_props[0].contributing_quotes.len(), 3);

    let csv = std::fs::read_to_string(dir.join("nhl_prizepicks_props.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "Player Name,Lean,Prop Line,Market,DraftKings,FanDuel,BetRivers,BetOnline.ag,Bovada,BetMGM,Fair Probability"
    );
    assert!(lines[1].starts_with("David Pastrnak,Over,0.5,Points,,,-154,-149,-161,,"));

    std::fs::remove_dir_all(&dir).unwrap();
}
