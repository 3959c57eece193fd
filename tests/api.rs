use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use nhl_stats_api::api::{router, AppState};
use nhl_stats_api::error::{StoreError, StoreResult};
use nhl_stats_api::filters::{GameQuery, GameSortKey, PlayerQuery, SortOrder};
use nhl_stats_api::models::{Game, GameDetail, Player, PlayerDetail, Team};
use nhl_stats_api::pagination::Page;
use nhl_stats_api::StatsRepository;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

/// Serves canned records and remembers the last normalized query
#[derive(Default)]
struct FakeRepository {
    players: Vec<Player>,
    teams: Vec<Team>,
    total: i64,
    fail: bool,
    last_player_query: Mutex<Option<PlayerQuery>>,
    last_game_query: Mutex<Option<GameQuery>>,
}

impl FakeRepository {
    fn check(&self) -> StoreResult<()> {
        if self.fail {
            Err(StoreError::Timeout(Duration::from_secs(10)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl StatsRepository for FakeRepository {
    async fn list_players(&self, query: &PlayerQuery) -> StoreResult<Page<Player>> {
        self.check()?;
        *self.last_player_query.lock().unwrap() = Some(query.clone());
        let records = self
            .players
            .iter()
            .take(query.page.limit() as usize)
            .cloned()
            .collect();
        Ok(Page::new(records, self.total, query.page))
    }

    async fn get_player(&self, player_id: i64) -> StoreResult<Option<PlayerDetail>> {
        self.check()?;
        Ok(self
            .players
            .iter()
            .find(|p| p.player_id == player_id)
            .map(|p| PlayerDetail {
                player: p.clone(),
                current_team_name: None,
            }))
    }

    async fn list_games(&self, query: &GameQuery) -> StoreResult<Page<Game>> {
        self.check()?;
        *self.last_game_query.lock().unwrap() = Some(query.clone());
        Ok(Page::new(vec![], self.total, query.page))
    }

    async fn get_game(&self, _game_id: i64) -> StoreResult<Option<GameDetail>> {
        self.check()?;
        Ok(None)
    }

    async fn list_teams(&self) -> StoreResult<Vec<Team>> {
        self.check()?;
        Ok(self.teams.clone())
    }

    async fn get_team(&self, team_id: i64) -> StoreResult<Option<Team>> {
        self.check()?;
        Ok(self.teams.iter().find(|t| t.id == team_id).cloned())
    }

    async fn close(&self) {}
}

fn player(id: i64) -> Player {
    Player {
        player_id: id,
        first_name: Some("Test".to_string()),
        last_name: Some(format!("Player{}", id)),
        height_in_inches: Some(72),
        height_in_centimeters: Some(183),
        weight_in_pounds: Some(200),
        weight_in_kilograms: Some(91),
        birth_date: Some("1995-01-01".to_string()),
        birth_country: Some("CAN".to_string()),
        shoots_catches: Some("L".to_string()),
        sweater_number: Some(id % 99),
        is_active: true,
        current_team_id: None,
        current_team_abbrev: None,
        team_logo: None,
    }
}

fn team(id: i64, name: &str, code: &str) -> Team {
    Team {
        id,
        full_name: Some(name.to_string()),
        tri_code: Some(code.to_string()),
        team_logo: None,
    }
}

fn app(repo: Arc<FakeRepository>) -> Router {
    router(AppState::new(repo), &["*".to_string()])
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

#[tokio::test]
async fn test_players_page_shape() {
    let repo = Arc::new(FakeRepository {
        players: (1..=30).map(player).collect(),
        total: 51,
        ..Default::default()
    });

    let (status, body) = get(app(repo.clone()), "/api/players?page=2&limit=25").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["players"].as_array().unwrap().len(), 25);
    assert_eq!(body["total"], 51);
    assert_eq!(body["page"], 2);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["limit"], 25);

    let query = repo.last_player_query.lock().unwrap().clone().unwrap();
    assert_eq!(query.page.offset(), 25);
}

#[tokio::test]
async fn test_players_bad_paging_uses_defaults() {
    let repo = Arc::new(FakeRepository::default());

    let (status, body) = get(app(repo.clone()), "/api/players?page=-5&limit=abc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 25);
    assert_eq!(body["total"], 0);
    assert_eq!(body["totalPages"], 0);
}

#[tokio::test]
async fn test_empty_filters_match_absent_filters() {
    let repo = Arc::new(FakeRepository::default());

    get(
        app(repo.clone()),
        "/api/players?search_term=&filter_team=&filter_status=&filter_weight_min=",
    )
    .await;
    let with_empty = repo.last_player_query.lock().unwrap().clone().unwrap();

    get(app(repo.clone()), "/api/players").await;
    let without = repo.last_player_query.lock().unwrap().clone().unwrap();

    assert_eq!(with_empty, without);
}

#[tokio::test]
async fn test_missing_player_is_not_found() {
    let repo = Arc::new(FakeRepository {
        players: vec![player(8471214)],
        ..Default::default()
    });

    let (status, body) = get(app(repo.clone()), "/api/players/8471214").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["playerId"], 8471214);
    assert!(body["currentTeamName"].is_null());

    let (status, body) = get(app(repo.clone()), "/api/players/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Player not found");

    let (status, _) = get(app(repo), "/api/players/not-a-number").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_failure_is_generic_500() {
    let repo = Arc::new(FakeRepository {
        fail: true,
        ..Default::default()
    });

    let (status, body) = get(app(repo.clone()), "/api/players").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch players");
    assert!(!body.to_string().contains("timed out"));

    let (status, body) = get(app(repo), "/api/games/5").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch game");
}

#[tokio::test]
async fn test_games_sort_fallback() {
    let repo = Arc::new(FakeRepository {
        total: 120,
        ..Default::default()
    });

    let (status, body) = get(
        app(repo.clone()),
        "/api/games?sort_by=bogus&sort_order=ASC&gameType=Pre.",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sort_by"], "id");
    assert_eq!(body["sort_order"], "asc");
    assert_eq!(body["recordsPerPage"], 50);
    assert_eq!(body["pages"], 3);

    let query = repo.last_game_query.lock().unwrap().clone().unwrap();
    assert_eq!(query.sort.key, GameSortKey::Id);
    assert_eq!(query.sort.order, SortOrder::Asc);

    let (_, body) = get(app(repo), "/api/games?sort_by=home_team_name&sort_order=up").await;
    assert_eq!(body["sort_by"], "home_team_name");
    assert_eq!(body["sort_order"], "desc");
}

#[tokio::test]
async fn test_missing_game_is_not_found() {
    let repo = Arc::new(FakeRepository::default());

    let (status, body) = get(app(repo), "/api/games/2023020001").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Game not found");
}

#[tokio::test]
async fn test_teams() {
    let repo = Arc::new(FakeRepository {
        teams: vec![
            team(24, "Anaheim Ducks", "ANA"),
            team(3, "New York Rangers", "NYR"),
        ],
        ..Default::default()
    });

    let (status, body) = get(app(repo.clone()), "/api/teams").await;
    assert_eq!(status, StatusCode::OK);
    let teams = body.as_array().unwrap();
    assert_eq!(teams.len(), 2);
    assert_eq!(teams[0]["fullName"], "Anaheim Ducks");
    assert_eq!(teams[1]["triCode"], "NYR");

    let (status, body) = get(app(repo.clone()), "/api/teams/3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fullName"], "New York Rangers");

    let (status, body) = get(app(repo), "/api/teams/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Team not found");
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(app(Arc::new(FakeRepository::default())), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].as_str().is_some());
}
