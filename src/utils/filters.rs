//! Raw query-string parameters and their normalized, typed form.
//!
//! Every parameter arrives as optional text. Normalization never fails: empty
//! input is dropped and bad paging is replaced by a default.

use serde::{Deserialize, Serialize};

use super::pagination::{PageRequest, DEFAULT_GAME_PAGE_SIZE, DEFAULT_PLAYER_PAGE_SIZE};

/// Trimmed, non-empty text or nothing
fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// A numeric filter as given. Text that is not a number is kept so the
/// filter still narrows the result instead of vanishing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NumericFilter {
    Int(i64),
    Literal(String),
}

impl NumericFilter {
    pub fn from_param(value: &Option<String>) -> Option<Self> {
        non_empty(value).map(|v| match v.parse() {
            Ok(n) => Self::Int(n),
            Err(_) => Self::Literal(v),
        })
    }
}

/// Query string accepted by the players listing
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlayerParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search_term: Option<String>,
    pub filter_name: Option<String>,
    pub filter_team: Option<String>,
    pub filter_hand: Option<String>,
    pub filter_country: Option<String>,
    pub filter_status: Option<String>,
    pub filter_number: Option<String>,
    pub filter_weight_min: Option<String>,
    pub filter_weight_max: Option<String>,
}

/// Query string accepted by the games listing
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GameParams {
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub search_column: Option<String>,
    pub search_term: Option<String>,
    pub season: Option<String>,
    #[serde(rename = "gameDate")]
    pub game_date: Option<String>,
    #[serde(rename = "startTime")]
    pub start_time: Option<String>,
    #[serde(rename = "gameType")]
    pub game_type: Option<String>,
    #[serde(rename = "homeTeam")]
    pub home_team: Option<String>,
    #[serde(rename = "awayTeam")]
    pub away_team: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Roster status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActiveStatus {
    Active,
    Inactive,
}

impl ActiveStatus {
    pub fn from_param(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }

    /// The text the players table stores in `isActive`
    pub fn stored_value(&self) -> &'static str {
        match self {
            Self::Active => "True",
            Self::Inactive => "False",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlayerFilters {
    pub search_term: Option<String>,
    pub name: Option<String>,
    pub team: Option<String>,
    pub hand: Option<String>,
    pub country: Option<String>,
    pub status: Option<ActiveStatus>,
    pub number: Option<NumericFilter>,
    pub weight_min: Option<NumericFilter>,
    pub weight_max: Option<NumericFilter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerQuery {
    pub page: PageRequest,
    pub filters: PlayerFilters,
}

impl PlayerQuery {
    pub fn from_params(params: &PlayerParams) -> Self {
        let page = PageRequest::from_params(
            params.page.as_deref(),
            params.limit.as_deref(),
            DEFAULT_PLAYER_PAGE_SIZE,
        );

        let filters = PlayerFilters {
            search_term: non_empty(&params.search_term),
            name: non_empty(&params.filter_name),
            team: non_empty(&params.filter_team),
            hand: non_empty(&params.filter_hand),
            country: non_empty(&params.filter_country),
            status: non_empty(&params.filter_status).and_then(|s| ActiveStatus::from_param(&s)),
            number: NumericFilter::from_param(&params.filter_number),
            weight_min: NumericFilter::from_param(&params.filter_weight_min),
            weight_max: NumericFilter::from_param(&params.filter_weight_max),
        };

        Self { page, filters }
    }
}

/// Game type filter after mapping friendly names to stored codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GameTypeFilter {
    Code(i64),
    /// Unrecognized input, compared as text so it matches nothing
    Literal(String),
}

impl GameTypeFilter {
    pub fn from_param(value: &str) -> Self {
        let trimmed = value.trim();
        let key = trimmed.trim_end_matches('.').to_ascii_lowercase();
        match key.as_str() {
            "pre" => Self::Code(1),
            "reg" => Self::Code(2),
            "post" => Self::Code(3),
            _ => match trimmed.parse::<i64>() {
                Ok(code) => Self::Code(code),
                Err(_) => Self::Literal(trimmed.to_string()),
            },
        }
    }
}

/// Columns the generic games search may target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameSearchColumn {
    Id,
    Season,
    GameDate,
    EasternStartTime,
    GameType,
    GameNumber,
    HomeTeamId,
    AwayTeamId,
    HomeScore,
    AwayScore,
}

impl GameSearchColumn {
    pub fn from_param(value: &str) -> Option<Self> {
        let column = match value {
            "id" => Self::Id,
            "season" => Self::Season,
            "gameDate" => Self::GameDate,
            "easternStartTime" => Self::EasternStartTime,
            "gameType" => Self::GameType,
            "gameNumber" => Self::GameNumber,
            "homeTeamId" => Self::HomeTeamId,
            "awayTeamId" => Self::AwayTeamId,
            "homeScore" => Self::HomeScore,
            "awayScore" => Self::AwayScore,
            _ => return None,
        };
        Some(column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GameSearch {
    /// Either the home or the away team has this id
    Team(String),
    Column(GameSearchColumn, String),
}

impl GameSearch {
    /// Returns `None` when either half is missing or the column is not searchable
    pub fn from_params(column: &Option<String>, term: &Option<String>) -> Option<Self> {
        let column = non_empty(column)?;
        let term = non_empty(term)?;
        if column == "team" {
            return Some(Self::Team(term));
        }
        match GameSearchColumn::from_param(&column) {
            Some(column) => Some(Self::Column(column, term)),
            None => {
                tracing::warn!(search_column = %column, "ignoring unsupported search column");
                None
            }
        }
    }
}

/// Logical sort keys accepted by the games listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum GameSortKey {
    GameDate,
    HomeTeamName,
    AwayTeamName,
    HomeScore,
    AwayScore,
    #[default]
    Id,
    Season,
    GameNumber,
    EasternStartTime,
    GameType,
}

impl GameSortKey {
    /// Unknown keys fall back to `Id`
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("gameDate") => Self::GameDate,
            Some("home_team_name") => Self::HomeTeamName,
            Some("away_team_name") => Self::AwayTeamName,
            Some("homeScore") => Self::HomeScore,
            Some("awayScore") => Self::AwayScore,
            Some("season") => Self::Season,
            Some("gameNumber") => Self::GameNumber,
            Some("easternStartTime") => Self::EasternStartTime,
            Some("gameType") => Self::GameType,
            _ => Self::Id,
        }
    }

    /// The name callers use for this key
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GameDate => "gameDate",
            Self::HomeTeamName => "home_team_name",
            Self::AwayTeamName => "away_team_name",
            Self::HomeScore => "homeScore",
            Self::AwayScore => "awayScore",
            Self::Id => "id",
            Self::Season => "season",
            Self::GameNumber => "gameNumber",
            Self::EasternStartTime => "easternStartTime",
            Self::GameType => "gameType",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Only `asc` (any case) sorts ascending
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("asc") => Self::Asc,
            _ => Self::Desc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GameSort {
    pub key: GameSortKey,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GameFilters {
    pub search: Option<GameSearch>,
    pub season: Option<String>,
    pub game_date: Option<String>,
    pub start_time: Option<String>,
    pub game_type: Option<GameTypeFilter>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameQuery {
    pub page: PageRequest,
    pub filters: GameFilters,
    pub sort: GameSort,
}

impl GameQuery {
    pub fn from_params(params: &GameParams) -> Self {
        let page = PageRequest::from_params(
            params.page.as_deref(),
            params.per_page.as_deref(),
            DEFAULT_GAME_PAGE_SIZE,
        );

        let filters = GameFilters {
            search: GameSearch::from_params(&params.search_column, &params.search_term),
            season: non_empty(&params.season),
            game_date: non_empty(&params.game_date),
            start_time: non_empty(&params.start_time),
            game_type: non_empty(&params.game_type).map(|t| GameTypeFilter::from_param(&t)),
            home_team: non_empty(&params.home_team),
            away_team: non_empty(&params.away_team),
        };

        let sort = GameSort {
            key: GameSortKey::from_param(params.sort_by.as_deref()),
            order: SortOrder::from_param(params.sort_order.as_deref()),
        };

        Self {
            page,
            filters,
            sort,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_player_params_are_no_ops() {
        let empty = PlayerParams {
            search_term: Some(String::new()),
            filter_name: Some("  ".to_string()),
            filter_team: Some(String::new()),
            filter_status: Some(String::new()),
            filter_number: Some(String::new()),
            filter_weight_min: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            PlayerQuery::from_params(&empty),
            PlayerQuery::from_params(&PlayerParams::default())
        );
        assert_eq!(PlayerQuery::from_params(&empty).filters, PlayerFilters::default());
    }

    #[test]
    fn test_player_status() {
        assert_eq!(ActiveStatus::from_param("active"), Some(ActiveStatus::Active));
        assert_eq!(ActiveStatus::from_param("Inactive"), Some(ActiveStatus::Inactive));
        assert_eq!(ActiveStatus::from_param("retired"), None);
        assert_eq!(ActiveStatus::Active.stored_value(), "True");
        assert_eq!(ActiveStatus::Inactive.stored_value(), "False");
    }

    #[test]
    fn test_numeric_player_filters() {
        let params = PlayerParams {
            filter_number: Some("91".to_string()),
            filter_weight_min: Some(" 200 ".to_string()),
            filter_weight_max: Some("heavy".to_string()),
            ..Default::default()
        };
        let filters = PlayerQuery::from_params(&params).filters;
        assert_eq!(filters.number, Some(NumericFilter::Int(91)));
        assert_eq!(filters.weight_min, Some(NumericFilter::Int(200)));
        assert_eq!(
            filters.weight_max,
            Some(NumericFilter::Literal("heavy".to_string()))
        );
    }

    #[test]
    fn test_game_type_normalization() {
        for input in ["pre", "Pre.", "PRE", "pre."] {
            assert_eq!(GameTypeFilter::from_param(input), GameTypeFilter::Code(1));
        }
        assert_eq!(GameTypeFilter::from_param("Reg."), GameTypeFilter::Code(2));
        assert_eq!(GameTypeFilter::from_param("post"), GameTypeFilter::Code(3));
        assert_eq!(GameTypeFilter::from_param("2"), GameTypeFilter::Code(2));
        assert_eq!(
            GameTypeFilter::from_param("xyz"),
            GameTypeFilter::Literal("xyz".to_string())
        );
    }

    #[test]
    fn test_sort_key_fallback() {
        assert_eq!(GameSortKey::from_param(Some("home_team_name")), GameSortKey::HomeTeamName);
        assert_eq!(GameSortKey::from_param(Some("id; DROP TABLE nhl_games")), GameSortKey::Id);
        assert_eq!(GameSortKey::from_param(None), GameSortKey::Id);
        assert_eq!(GameSortKey::from_param(Some("gameDate")).as_str(), "gameDate");
    }

    #[test]
    fn test_sort_order() {
        assert_eq!(SortOrder::from_param(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::from_param(Some("ASC")), SortOrder::Asc);
        assert_eq!(SortOrder::from_param(Some("desc")), SortOrder::Desc);
        assert_eq!(SortOrder::from_param(Some("sideways")), SortOrder::Desc);
        assert_eq!(SortOrder::from_param(None), SortOrder::Desc);
    }

    #[test]
    fn test_game_search() {
        let team = GameSearch::from_params(&Some("team".into()), &Some("10".into()));
        assert_eq!(team, Some(GameSearch::Team("10".to_string())));

        let season = GameSearch::from_params(&Some("season".into()), &Some("2023".into()));
        assert_eq!(
            season,
            Some(GameSearch::Column(GameSearchColumn::Season, "2023".to_string()))
        );

        assert_eq!(
            GameSearch::from_params(&Some("nhl_games.id; --".into()), &Some("1".into())),
            None
        );
        assert_eq!(GameSearch::from_params(&Some("season".into()), &Some("".into())), None);
        assert_eq!(GameSearch::from_params(&None, &Some("2023".into())), None);
    }

    #[test]
    fn test_game_query_defaults() {
        let query = GameQuery::from_params(&GameParams::default());
        assert_eq!(query.page.page, 1);
        assert_eq!(query.page.page_size, DEFAULT_GAME_PAGE_SIZE);
        assert_eq!(query.filters, GameFilters::default());
        assert_eq!(query.sort, GameSort::default());
        assert_eq!(query.sort.key, GameSortKey::Id);
        assert_eq!(query.sort.order, SortOrder::Desc);
    }
}
