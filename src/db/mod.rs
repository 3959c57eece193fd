pub mod games;
pub mod players;
pub mod teams;

use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::{future::Future, time::Duration};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::{ConfigError, StoreError, StoreResult};
use crate::models::{Game, GameDetail, Player, PlayerDetail, Team};
use crate::utils::filters::{GameQuery, PlayerQuery};
use crate::utils::pagination::Page;

/// Read access to the stats collections
#[async_trait]
pub trait StatsRepository: Send + Sync {
    async fn list_players(&self, query: &PlayerQuery) -> StoreResult<Page<Player>>;

    async fn get_player(&self, player_id: i64) -> StoreResult<Option<PlayerDetail>>;

    async fn list_games(&self, query: &GameQuery) -> StoreResult<Page<Game>>;

    async fn get_game(&self, game_id: i64) -> StoreResult<Option<GameDetail>>;

    /// Every team, ordered by full name
    async fn list_teams(&self) -> StoreResult<Vec<Team>>;

    async fn get_team(&self, team_id: i64) -> StoreResult<Option<Team>>;

    /// Release every pooled connection. Called once on shutdown.
    async fn close(&self);
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to connect to the stats database: {0}")]
    Database(#[from] sqlx::Error),
}

/// Open the connection pool. Connects eagerly so a bad configuration fails at startup.
pub async fn connect(config: &DatabaseConfig) -> Result<MySqlPool, ConnectError> {
    let options = config.connect_options()?;

    let pool = MySqlPoolOptions::new()
        .max_connections(config.pool_size)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options)
        .await?;

    info!(
        pool_size = config.pool_size,
        database = %config.name,
        "Database connection pool created"
    );
    Ok(pool)
}

/// [`StatsRepository`] backed by a MySQL pool
#[derive(Clone)]
pub struct MySqlStatsRepository {
    pool: MySqlPool,
    query_timeout: Duration,
}

impl MySqlStatsRepository {
    pub fn new(pool: MySqlPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Run `fut` under the request-scoped timeout. On timeout the future is
    /// dropped, which hands its connection back to the pool.
    async fn timed<T, F>(&self, fut: F) -> StoreResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>> + Send,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Timeout(self.query_timeout)),
        }
    }
}

#[async_trait]
impl StatsRepository for MySqlStatsRepository {
    async fn list_players(&self, query: &PlayerQuery) -> StoreResult<Page<Player>> {
        self.timed(players::list(&self.pool, query)).await
    }

    async fn get_player(&self, player_id: i64) -> StoreResult<Option<PlayerDetail>> {
        self.timed(players::get(&self.pool, player_id)).await
    }

    async fn list_games(&self, query: &GameQuery) -> StoreResult<Page<Game>> {
        self.timed(games::list(&self.pool, query)).await
    }

    async fn get_game(&self, game_id: i64) -> StoreResult<Option<GameDetail>> {
        self.timed(games::get(&self.pool, game_id)).await
    }

    async fn list_teams(&self) -> StoreResult<Vec<Team>> {
        self.timed(teams::list(&self.pool)).await
    }

    async fn get_team(&self, team_id: i64) -> StoreResult<Option<Team>> {
        self.timed(teams::get(&self.pool, team_id)).await
    }

    async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }
}
