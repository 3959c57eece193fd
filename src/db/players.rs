use sqlx::{mysql::MySqlPool, FromRow, MySql, QueryBuilder};

use crate::models::{Player, PlayerDetail};
use crate::utils::filters::{NumericFilter, PlayerFilters, PlayerQuery};
use crate::utils::pagination::{Page, PageRequest};
use crate::utils::sql::{Predicate, WhereClause};

const COLUMNS: &str = "\
    CAST(nhl_players.playerId AS SIGNED) AS player_id, \
    CAST(nhl_players.firstName AS CHAR) AS first_name, \
    CAST(nhl_players.lastName AS CHAR) AS last_name, \
    CAST(nhl_players.heightInInches AS SIGNED) AS height_in_inches, \
    CAST(nhl_players.heightInCentimeters AS SIGNED) AS height_in_centimeters, \
    CAST(nhl_players.weightInPounds AS SIGNED) AS weight_in_pounds, \
    CAST(nhl_players.weightInKilograms AS SIGNED) AS weight_in_kilograms, \
    CAST(nhl_players.birthDate AS CHAR) AS birth_date, \
    CAST(nhl_players.birthCountry AS CHAR) AS birth_country, \
    CAST(nhl_players.shootsCatches AS CHAR) AS shoots_catches, \
    CAST(nhl_players.sweaterNumber AS SIGNED) AS sweater_number, \
    CAST(nhl_players.isActive AS CHAR) AS is_active, \
    CAST(nhl_players.currentTeamID AS SIGNED) AS current_team_id, \
    CAST(nhl_teams.triCode AS CHAR) AS current_team_abbrev, \
    CAST(nhl_teams.teamLogo AS CHAR) AS team_logo";

// Left join: players without a current team still show up
const FROM: &str =
    " FROM nhl_players LEFT JOIN nhl_teams ON nhl_players.currentTeamID = nhl_teams.id";

const NAME_COLUMNS: [&str; 3] = [
    "nhl_players.firstName",
    "nhl_players.lastName",
    "CONCAT(nhl_players.firstName, ' ', nhl_players.lastName)",
];

#[derive(Debug, FromRow)]
struct PlayerRow {
    player_id: i64,
    first_name: Option<String>,
    last_name: Option<String>,
    height_in_inches: Option<i64>,
    height_in_centimeters: Option<i64>,
    weight_in_pounds: Option<i64>,
    weight_in_kilograms: Option<i64>,
    birth_date: Option<String>,
    birth_country: Option<String>,
    shoots_catches: Option<String>,
    sweater_number: Option<i64>,
    is_active: Option<String>,
    current_team_id: Option<i64>,
    current_team_abbrev: Option<String>,
    team_logo: Option<String>,
}

#[derive(Debug, FromRow)]
struct PlayerDetailRow {
    #[sqlx(flatten)]
    player: PlayerRow,
    current_team_name: Option<String>,
}

impl From<PlayerRow> for Player {
    fn from(row: PlayerRow) -> Self {
        Player {
            player_id: row.player_id,
            first_name: row.first_name,
            last_name: row.last_name,
            height_in_inches: row.height_in_inches,
            height_in_centimeters: row.height_in_centimeters,
            weight_in_pounds: row.weight_in_pounds,
            weight_in_kilograms: row.weight_in_kilograms,
            birth_date: row.birth_date,
            birth_country: row.birth_country,
            shoots_catches: row.shoots_catches,
            sweater_number: row.sweater_number,
            is_active: row
                .is_active
                .as_deref()
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("true")),
            current_team_id: row.current_team_id,
            current_team_abbrev: row.current_team_abbrev,
            team_logo: row.team_logo,
        }
    }
}

/// Predicates for the players listing. Count and page queries share them.
pub fn where_clause(filters: &PlayerFilters) -> WhereClause {
    let mut clause = WhereClause::new();

    if let Some(term) = &filters.search_term {
        clause.push(Predicate::contains_any(&NAME_COLUMNS, term));
    }
    if let Some(name) = &filters.name {
        clause.push(Predicate::contains_any(&NAME_COLUMNS, name));
    }
    if let Some(team) = &filters.team {
        clause.push(Predicate::contains("nhl_teams.triCode", team));
    }
    if let Some(hand) = &filters.hand {
        clause.push(Predicate::contains("nhl_players.shootsCatches", hand));
    }
    if let Some(country) = &filters.country {
        clause.push(Predicate::contains("nhl_players.birthCountry", country));
    }
    if let Some(status) = filters.status {
        clause.push(Predicate::eq_text(
            "nhl_players.isActive",
            status.stored_value(),
        ));
    }
    match &filters.number {
        Some(NumericFilter::Int(number)) => {
            clause.push(Predicate::eq_int("nhl_players.sweaterNumber", *number));
        }
        Some(NumericFilter::Literal(number)) => {
            clause.push(Predicate::eq_text(
                "CAST(nhl_players.sweaterNumber AS CHAR)",
                number,
            ));
        }
        None => {}
    }
    match &filters.weight_min {
        Some(NumericFilter::Int(min)) => {
            clause.push(Predicate::at_least("nhl_players.weightInPounds", *min));
        }
        Some(NumericFilter::Literal(_)) => clause.push(Predicate::never()),
        None => {}
    }
    match &filters.weight_max {
        Some(NumericFilter::Int(max)) => {
            clause.push(Predicate::at_most("nhl_players.weightInPounds", *max));
        }
        Some(NumericFilter::Literal(_)) => clause.push(Predicate::never()),
        None => {}
    }

    clause
}

fn count_query(filter: &WhereClause) -> QueryBuilder<'static, MySql> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*)");
    builder.push(FROM);
    filter.push_to(&mut builder);
    builder
}

fn page_query(filter: &WhereClause, page: PageRequest) -> QueryBuilder<'static, MySql> {
    let mut builder = QueryBuilder::new("SELECT ");
    builder.push(COLUMNS).push(FROM);
    filter.push_to(&mut builder);
    builder
        .push(" ORDER BY nhl_players.playerId DESC LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());
    builder
}

pub async fn list(pool: &MySqlPool, query: &PlayerQuery) -> Result<Page<Player>, sqlx::Error> {
    let filter = where_clause(&query.filters);
    let mut count = count_query(&filter);
    let mut page = page_query(&filter, query.page);

    let (total, rows) = tokio::try_join!(
        count.build_query_scalar::<i64>().fetch_one(pool),
        page.build_query_as::<PlayerRow>().fetch_all(pool),
    )?;

    Ok(Page::new(rows, total, query.page).map(Player::from))
}

pub async fn get(pool: &MySqlPool, player_id: i64) -> Result<Option<PlayerDetail>, sqlx::Error> {
    let sql = format!(
        "SELECT {}, CAST(nhl_teams.fullName AS CHAR) AS current_team_name{} \
         WHERE nhl_players.playerId = ?",
        COLUMNS, FROM
    );

    let row = sqlx::query_as::<_, PlayerDetailRow>(&sql)
        .bind(player_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| PlayerDetail {
        player: row.player.into(),
        current_team_name: row.current_team_name,
    }))
}
