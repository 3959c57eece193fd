use axum::{
    extract::{Path, State},
    Json,
};
use tracing::error;

use super::{parse_id, AppState};
use crate::error::ApiError;
use crate::models::Team;

pub async fn list_teams(State(state): State<AppState>) -> Result<Json<Vec<Team>>, ApiError> {
    let teams = state.repo.list_teams().await.map_err(|e| {
        error!(error = %e, "Error fetching teams");
        ApiError::Store {
            collection: "teams",
            source: e,
        }
    })?;

    Ok(Json(teams))
}

pub async fn get_team(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Result<Json<Team>, ApiError> {
    let team_id = parse_id(&team_id, "Team")?;

    let team = state.repo.get_team(team_id).await.map_err(|e| {
        error!(error = %e, team_id, "Error fetching team");
        ApiError::Store {
            collection: "team",
            source: e,
        }
    })?;

    team.map(Json).ok_or(ApiError::NotFound("Team"))
}
