use sqlx::{mysql::MySqlPool, FromRow};

use crate::models::Team;

const SELECT: &str = "SELECT \
    CAST(id AS SIGNED) AS id, \
    CAST(fullName AS CHAR) AS full_name, \
    CAST(triCode AS CHAR) AS tri_code, \
    CAST(teamLogo AS CHAR) AS team_logo \
    FROM nhl_teams";

#[derive(Debug, FromRow)]
struct TeamRow {
    id: i64,
    full_name: Option<String>,
    tri_code: Option<String>,
    team_logo: Option<String>,
}

impl From<TeamRow> for Team {
    fn from(row: TeamRow) -> Self {
        Team {
            id: row.id,
            full_name: row.full_name,
            tri_code: row.tri_code,
            team_logo: row.team_logo,
        }
    }
}

/// Teams are few, so they are never paginated
pub async fn list(pool: &MySqlPool) -> Result<Vec<Team>, sqlx::Error> {
    let sql = format!("{} ORDER BY fullName", SELECT);
    let rows = sqlx::query_as::<_, TeamRow>(&sql).fetch_all(pool).await?;
    Ok(rows.into_iter().map(Team::from).collect())
}

pub async fn get(pool: &MySqlPool, team_id: i64) -> Result<Option<Team>, sqlx::Error> {
    let sql = format!("{} WHERE id = ?", SELECT);
    let row = sqlx::query_as::<_, TeamRow>(&sql)
        .bind(team_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Team::from))
}
