use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::{parse_id, AppState};
use crate::error::ApiError;
use crate::models::{Game, GameDetail};
use crate::utils::filters::{GameParams, GameQuery};

#[derive(Debug, Serialize, Deserialize)]
pub struct GameListResponse {
    pub games: Vec<Game>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
    #[serde(rename = "recordsPerPage")]
    pub records_per_page: i64,
    /// The sort key actually applied, after falling back for unknown input
    pub sort_by: String,
    pub sort_order: String,
}

pub async fn list_games(
    State(state): State<AppState>,
    params: Option<Query<GameParams>>,
) -> Result<Json<GameListResponse>, ApiError> {
    let params = params.map(|Query(p)| p).unwrap_or_default();
    let query = GameQuery::from_params(&params);
    debug!(?query, "listing games");

    let page = state.repo.list_games(&query).await.map_err(|e| {
        error!(error = %e, ?query, "Error fetching games");
        ApiError::Store {
            collection: "games",
            source: e,
        }
    })?;

    Ok(Json(GameListResponse {
        pages: page.total_pages(),
        total: page.total,
        page: page.page,
        records_per_page: page.page_size,
        games: page.records,
        sort_by: query.sort.key.as_str().to_string(),
        sort_order: query.sort.order.as_str().to_string(),
    }))
}

pub async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<GameDetail>, ApiError> {
    let game_id = parse_id(&game_id, "Game")?;

    let game = state.repo.get_game(game_id).await.map_err(|e| {
        error!(error = %e, game_id, "Error fetching game");
        ApiError::Store {
            collection: "game",
            source: e,
        }
    })?;

    game.map(Json).ok_or(ApiError::NotFound("Game"))
}
