//! API route handlers.
//!
//! All endpoints return JSON. State is the shared `PropService`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use crate::engine::{PropService, PropsReport};
use crate::sports::Sport;
use crate::types::{ConsensusError, EventSummary};

pub type AppState = Arc<PropService>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Handler error rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

impl From<ConsensusError> for ApiError {
    fn from(err: ConsensusError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<ConsensusError>() {
            Some(ConsensusError::UnknownSport(_)) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %format!("{:#}", self.0), "Request failed");
        }
        (status, Json(ErrorBody { error: self.0.to_string() })).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct EventResponse {
    pub id: String,
    pub matchup: String,
    pub commence_time: Option<DateTime<Utc>>,
}

impl From<EventSummary> for EventResponse {
    fn from(event: EventSummary) -> Self {
        Self {
            matchup: event.matchup(),
            id: event.id,
            commence_time: event.commence_time,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PropsQuery {
    pub player_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// GET /api/sports
pub async fn get_sports(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.sports().iter().map(|s| s.slug().to_string()).collect())
}

/// GET /api/:sport/events
pub async fn get_events(
    State(state): State<AppState>,
    Path(sport): Path<String>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let sport: Sport = sport.parse()?;
    let events = state.events(sport).await?;
    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}

/// GET /api/:sport/player-props?player_name=...
pub async fn get_player_props(
    State(state): State<AppState>,
    Path(sport): Path<String>,
    Query(query): Query<PropsQuery>,
) -> Result<Json<PropsReport>, ApiError> {
    let sport: Sport = sport.parse()?;
    let filter = query.player_name.as_deref().filter(|name| !name.trim().is_empty());
    let report = state.player_props(sport, filter).await?;
    Ok(Json(report))
}
