use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::{parse_id, AppState};
use crate::error::ApiError;
use crate::models::{Player, PlayerDetail};
use crate::utils::filters::{PlayerParams, PlayerQuery};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerListResponse {
    pub players: Vec<Player>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
    pub limit: i64,
}

pub async fn list_players(
    State(state): State<AppState>,
    params: Option<Query<PlayerParams>>,
) -> Result<Json<PlayerListResponse>, ApiError> {
    let params = params.map(|Query(p)| p).unwrap_or_default();
    let query = PlayerQuery::from_params(&params);
    debug!(?query, "listing players");

    let page = state.repo.list_players(&query).await.map_err(|e| {
        error!(error = %e, ?query, "Error fetching players");
        ApiError::Store {
            collection: "players",
            source: e,
        }
    })?;

    Ok(Json(PlayerListResponse {
        total_pages: page.total_pages(),
        total: page.total,
        page: page.page,
        limit: page.page_size,
        players: page.records,
    }))
}

pub async fn get_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<PlayerDetail>, ApiError> {
    let player_id = parse_id(&player_id, "Player")?;

    let player = state.repo.get_player(player_id).await.map_err(|e| {
        error!(error = %e, player_id, "Error fetching player");
        ApiError::Store {
            collection: "player",
            source: e,
        }
    })?;

    player.map(Json).ok_or(ApiError::NotFound("Player"))
}
