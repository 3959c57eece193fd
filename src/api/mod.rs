pub mod games;
pub mod health;
pub mod players;
pub mod teams;

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::get,
    Router,
};
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::db::StatsRepository;
use crate::error::ApiError;

/// Shared handler state. Holds nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn StatsRepository>,
}

impl AppState {
    pub fn new(repo: Arc<dyn StatsRepository>) -> Self {
        Self { repo }
    }
}

/// Build the full API router
pub fn router(state: AppState, cors_allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/api/players", get(players::list_players))
        .route("/api/players/:player_id", get(players::get_player))
        .route("/api/games", get(games::list_games))
        .route("/api/games/:game_id", get(games::get_game))
        .route("/api/teams", get(teams::list_teams))
        .route("/api/teams/:team_id", get(teams::get_team))
        .route("/api/health", get(health::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_allowed_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

/// Path ids are numeric; anything else cannot match a record
pub(crate) fn parse_id(raw: &str, resource: &'static str) -> Result<i64, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::NotFound(resource))
}
