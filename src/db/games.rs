use sqlx::{mysql::MySqlPool, FromRow, MySql, QueryBuilder};

use crate::models::{Game, GameDetail};
use crate::utils::filters::{
    GameFilters, GameQuery, GameSearch, GameSearchColumn, GameSort, GameSortKey, GameTypeFilter,
};
use crate::utils::format::{format_game_date, format_season, format_start_time, game_type_label};
use crate::utils::pagination::{Page, PageRequest};
use crate::utils::sql::{Predicate, WhereClause};

const COLUMNS: &str = "\
    CAST(nhl_games.id AS SIGNED) AS id, \
    CAST(nhl_games.season AS CHAR) AS season, \
    CAST(nhl_games.gameDate AS CHAR) AS game_date, \
    CAST(nhl_games.easternStartTime AS CHAR) AS eastern_start_time, \
    CAST(nhl_games.gameType AS SIGNED) AS game_type, \
    CAST(nhl_games.gameNumber AS SIGNED) AS game_number, \
    CAST(nhl_games.homeScore AS SIGNED) AS home_score, \
    CAST(nhl_games.awayScore AS SIGNED) AS away_score, \
    CAST(home_teams.id AS SIGNED) AS home_team_id, \
    CAST(home_teams.fullName AS CHAR) AS home_team_name, \
    CAST(away_teams.id AS SIGNED) AS away_team_id, \
    CAST(away_teams.fullName AS CHAR) AS away_team_name";

const DETAIL_COLUMNS: &str = "\
    CAST(home_teams.triCode AS CHAR) AS home_team_tricode, \
    CAST(home_teams.teamLogo AS CHAR) AS home_team_logo, \
    CAST(away_teams.triCode AS CHAR) AS away_team_tricode, \
    CAST(away_teams.teamLogo AS CHAR) AS away_team_logo";

// Inner joins: a game whose home or away team does not resolve is not listed
const FROM: &str = " FROM nhl_games \
    JOIN nhl_teams AS home_teams ON nhl_games.homeTeamId = home_teams.id \
    JOIN nhl_teams AS away_teams ON nhl_games.awayTeamId = away_teams.id";

#[derive(Debug, FromRow)]
struct GameRow {
    id: i64,
    season: Option<String>,
    game_date: Option<String>,
    eastern_start_time: Option<String>,
    game_type: Option<i64>,
    game_number: Option<i64>,
    home_score: Option<i64>,
    away_score: Option<i64>,
    home_team_id: i64,
    home_team_name: Option<String>,
    away_team_id: i64,
    away_team_name: Option<String>,
}

#[derive(Debug, FromRow)]
struct GameDetailRow {
    #[sqlx(flatten)]
    game: GameRow,
    home_team_tricode: Option<String>,
    home_team_logo: Option<String>,
    away_team_tricode: Option<String>,
    away_team_logo: Option<String>,
}

impl From<GameRow> for Game {
    fn from(row: GameRow) -> Self {
        Game {
            id: row.id,
            season: row.season.as_deref().map(format_season).unwrap_or_default(),
            game_date: row
                .game_date
                .as_deref()
                .map(format_game_date)
                .unwrap_or_default(),
            eastern_start_time: row
                .eastern_start_time
                .as_deref()
                .map(format_start_time)
                .unwrap_or_default(),
            game_type: game_type_label(row.game_type).to_string(),
            game_number: row.game_number,
            home_score: row.home_score,
            away_score: row.away_score,
            home_team_id: row.home_team_id,
            home_team_name: row.home_team_name,
            away_team_id: row.away_team_id,
            away_team_name: row.away_team_name,
        }
    }
}

impl From<GameDetailRow> for GameDetail {
    fn from(row: GameDetailRow) -> Self {
        let game = row.game;
        GameDetail {
            id: game.id,
            season: game.season,
            game_date: game.game_date,
            eastern_start_time: game.eastern_start_time,
            game_type: game.game_type,
            game_number: game.game_number,
            home_score: game.home_score,
            away_score: game.away_score,
            home_team_id: game.home_team_id,
            home_team_name: game.home_team_name,
            home_team_tricode: row.home_team_tricode,
            home_team_logo: row.home_team_logo,
            away_team_id: game.away_team_id,
            away_team_name: game.away_team_name,
            away_team_tricode: row.away_team_tricode,
            away_team_logo: row.away_team_logo,
        }
    }
}

/// Physical column behind each sort key
pub fn sort_column(key: GameSortKey) -> &'static str {
    match key {
        GameSortKey::GameDate => "nhl_games.gameDate",
        GameSortKey::HomeTeamName => "home_teams.fullName",
        GameSortKey::AwayTeamName => "away_teams.fullName",
        GameSortKey::HomeScore => "nhl_games.homeScore",
        GameSortKey::AwayScore => "nhl_games.awayScore",
        GameSortKey::Id => "nhl_games.id",
        GameSortKey::Season => "nhl_games.season",
        GameSortKey::GameNumber => "nhl_games.gameNumber",
        GameSortKey::EasternStartTime => "nhl_games.easternStartTime",
        GameSortKey::GameType => "nhl_games.gameType",
    }
}

/// Text expression the generic search matches against
fn search_expr(column: GameSearchColumn) -> &'static str {
    match column {
        GameSearchColumn::Id => "CAST(nhl_games.id AS CHAR)",
        GameSearchColumn::Season => "CAST(nhl_games.season AS CHAR)",
        GameSearchColumn::GameDate => "CAST(nhl_games.gameDate AS CHAR)",
        GameSearchColumn::EasternStartTime => "CAST(nhl_games.easternStartTime AS CHAR)",
        GameSearchColumn::GameType => "CAST(nhl_games.gameType AS CHAR)",
        GameSearchColumn::GameNumber => "CAST(nhl_games.gameNumber AS CHAR)",
        GameSearchColumn::HomeTeamId => "CAST(nhl_games.homeTeamId AS CHAR)",
        GameSearchColumn::AwayTeamId => "CAST(nhl_games.awayTeamId AS CHAR)",
        GameSearchColumn::HomeScore => "CAST(nhl_games.homeScore AS CHAR)",
        GameSearchColumn::AwayScore => "CAST(nhl_games.awayScore AS CHAR)",
    }
}

/// Predicates for the games listing. Count and page queries share them.
pub fn where_clause(filters: &GameFilters) -> WhereClause {
    let mut clause = WhereClause::new();

    match &filters.search {
        Some(GameSearch::Team(team_id)) => clause.push(Predicate::eq_text_any(
            &["CAST(home_teams.id AS CHAR)", "CAST(away_teams.id AS CHAR)"],
            team_id,
        )),
        Some(GameSearch::Column(column, term)) => {
            clause.push(Predicate::contains(search_expr(*column), term))
        }
        None => {}
    }

    if let Some(season) = &filters.season {
        clause.push(Predicate::contains("CAST(nhl_games.season AS CHAR)", season));
    }
    if let Some(date) = &filters.game_date {
        clause.push(Predicate::contains("CAST(nhl_games.gameDate AS CHAR)", date));
    }
    if let Some(time) = &filters.start_time {
        clause.push(Predicate::contains(
            "CAST(nhl_games.easternStartTime AS CHAR)",
            time,
        ));
    }
    match &filters.game_type {
        Some(GameTypeFilter::Code(code)) => {
            clause.push(Predicate::eq_int("nhl_games.gameType", *code))
        }
        Some(GameTypeFilter::Literal(literal)) => clause.push(Predicate::eq_text(
            "CAST(nhl_games.gameType AS CHAR)",
            literal,
        )),
        None => {}
    }
    if let Some(home) = &filters.home_team {
        clause.push(Predicate::contains("home_teams.fullName", home));
    }
    if let Some(away) = &filters.away_team {
        clause.push(Predicate::contains("away_teams.fullName", away));
    }

    clause
}

fn count_query(filter: &WhereClause) -> QueryBuilder<'static, MySql> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*)");
    builder.push(FROM);
    filter.push_to(&mut builder);
    builder
}

fn page_query(
    filter: &WhereClause,
    sort: GameSort,
    page: PageRequest,
) -> QueryBuilder<'static, MySql> {
    let mut builder = QueryBuilder::new("SELECT ");
    builder.push(COLUMNS).push(FROM);
    filter.push_to(&mut builder);
    // both come from fixed tables, never from request text
    builder
        .push(" ORDER BY ")
        .push(sort_column(sort.key))
        .push(" ")
        .push(sort.order.as_sql());
    // sort keys repeat across games; id keeps pages stable
    if sort.key != GameSortKey::Id {
        builder.push(", nhl_games.id ").push(sort.order.as_sql());
    }
    builder
        .push(" LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());
    builder
}

pub async fn list(pool: &MySqlPool, query: &GameQuery) -> Result<Page<Game>, sqlx::Error> {
    let filter = where_clause(&query.filters);
    let mut count = count_query(&filter);
    let mut page = page_query(&filter, query.sort, query.page);

    let (total, rows) = tokio::try_join!(
        count.build_query_scalar::<i64>().fetch_one(pool),
        page.build_query_as::<GameRow>().fetch_all(pool),
    )?;

    Ok(Page::new(rows, total, query.page).map(Game::from))
}

pub async fn get(pool: &MySqlPool, game_id: i64) -> Result<Option<GameDetail>, sqlx::Error> {
    let sql = format!(
        "SELECT {}, {}{} WHERE nhl_games.id = ?",
        COLUMNS, DETAIL_COLUMNS, FROM
    );

    let row = sqlx::query_as::<_, GameDetailRow>(&sql)
        .bind(game_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(GameDetail::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::filters::{GameParams, SortOrder};
    use crate::utils::sql::SqlValue;

    fn query(params: GameParams) -> GameQuery {
        GameQuery::from_params(&params)
    }

    fn text(s: &str) -> SqlValue {
        SqlValue::Text(s.to_string())
    }

    #[test]
    fn test_default_query_sorts_by_id_desc() {
        let q = query(GameParams::default());
        let clause = where_clause(&q.filters);
        assert!(clause.is_empty());
        let sql = page_query(&clause, q.sort, q.page).sql().to_string();
        assert!(sql.ends_with(" ORDER BY nhl_games.id DESC LIMIT ? OFFSET ?"));
        assert!(!sql.contains("WHERE"));
    }

    #[test]
    fn test_sort_uses_allow_listed_column() {
        let q = query(GameParams {
            sort_by: Some("home_team_name".to_string()),
            sort_order: Some("asc".to_string()),
            ..Default::default()
        });
        let sql = page_query(&where_clause(&q.filters), q.sort, q.page)
            .sql()
            .to_string();
        assert!(sql.contains(" ORDER BY home_teams.fullName ASC, nhl_games.id ASC LIMIT "));

        let q = query(GameParams {
            sort_by: Some("homeScore DESC; DELETE FROM nhl_games".to_string()),
            sort_order: Some("asc; --".to_string()),
            ..Default::default()
        });
        assert_eq!(q.sort.key, GameSortKey::Id);
        assert_eq!(q.sort.order, SortOrder::Desc);
        let sql = page_query(&where_clause(&q.filters), q.sort, q.page)
            .sql()
            .to_string();
        assert!(sql.contains(" ORDER BY nhl_games.id DESC LIMIT "));
        assert!(!sql.contains("DELETE"));
    }

    #[test]
    fn test_non_id_sort_breaks_ties_on_id() {
        let q = query(GameParams {
            sort_by: Some("gameDate".to_string()),
            ..Default::default()
        });
        let sql = page_query(&where_clause(&q.filters), q.sort, q.page)
            .sql()
            .to_string();
        assert!(sql.ends_with(" ORDER BY nhl_games.gameDate DESC, nhl_games.id DESC LIMIT ? OFFSET ?"));
    }

    #[test]
    fn test_team_search_matches_home_or_away() {
        let q = query(GameParams {
            search_column: Some("team".to_string()),
            search_term: Some("3".to_string()),
            ..Default::default()
        });
        let clause = where_clause(&q.filters);
        assert_eq!(
            clause.to_sql(),
            " WHERE (CAST(home_teams.id AS CHAR) = ? OR CAST(away_teams.id AS CHAR) = ?)"
        );
        assert_eq!(clause.values(), vec![&text("3"), &text("3")]);
    }

    #[test]
    fn test_column_search_combines_with_filters() {
        let q = query(GameParams {
            search_column: Some("season".to_string()),
            search_term: Some("2023".to_string()),
            game_type: Some("Reg.".to_string()),
            home_team: Some("Rangers".to_string()),
            ..Default::default()
        });
        let clause = where_clause(&q.filters);
        assert_eq!(
            clause.to_sql(),
            " WHERE LOWER(CAST(nhl_games.season AS CHAR)) LIKE ? ESCAPE '!' AND nhl_games.gameType = ? \
             AND LOWER(home_teams.fullName) LIKE ? ESCAPE '!'"
        );
        assert_eq!(
            clause.values(),
            vec![&text("%2023%"), &SqlValue::Int(2), &text("%rangers%")]
        );
    }

    #[test]
    fn test_unknown_game_type_is_compared_as_text() {
        let q = query(GameParams {
            game_type: Some("xyz".to_string()),
            ..Default::default()
        });
        let clause = where_clause(&q.filters);
        assert_eq!(clause.to_sql(), " WHERE CAST(nhl_games.gameType AS CHAR) = ?");
        assert_eq!(clause.values(), vec![&text("xyz")]);
    }

    #[test]
    fn test_unknown_search_column_is_ignored() {
        let q = query(GameParams {
            search_column: Some("player".to_string()),
            search_term: Some("Crosby".to_string()),
            ..Default::default()
        });
        assert!(where_clause(&q.filters).is_empty());
    }

    #[test]
    fn test_count_query_uses_same_joins() {
        let q = query(GameParams {
            start_time: Some("19:00".to_string()),
            ..Default::default()
        });
        let clause = where_clause(&q.filters);
        let count = count_query(&clause);
        assert!(count.sql().starts_with("SELECT COUNT(*) FROM nhl_games JOIN nhl_teams AS home_teams"));
        assert!(count
            .sql()
            .ends_with(" WHERE LOWER(CAST(nhl_games.easternStartTime AS CHAR)) LIKE ? ESCAPE '!'"));
    }

    #[test]
    fn test_row_formatting() {
        let row = GameRow {
            id: 2023020001,
            season: Some("20232024".to_string()),
            game_date: Some("2023-10-10".to_string()),
            eastern_start_time: Some("2023-10-10 19:30:00".to_string()),
            game_type: Some(2),
            game_number: Some(1),
            home_score: Some(5),
            away_score: Some(3),
            home_team_id: 14,
            home_team_name: Some("Tampa Bay Lightning".to_string()),
            away_team_id: 18,
            away_team_name: Some("Nashville Predators".to_string()),
        };
        let game = Game::from(row);
        assert_eq!(game.season, "2023-2024");
        assert_eq!(game.game_date, "10/10/2023");
        assert_eq!(game.eastern_start_time, "19:30");
        assert_eq!(game.game_type, "Reg.");
    }
}
