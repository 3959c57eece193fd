pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod utils;

pub use config::Config;
pub use db::{MySqlStatsRepository, StatsRepository};
pub use error::{ApiError, StoreError};
pub use models::*;
pub use utils::*;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Set up logging for the binaries. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Load `.env`, read the configuration and open the stats database
pub async fn connect_from_env() -> Result<(Config, MySqlStatsRepository)> {
    dotenv::dotenv().ok();

    let config = Config::from_env().context("Invalid configuration")?;
    let pool = db::connect(&config.database)
        .await
        .context("Failed to create database connection pool")?;
    let repo = MySqlStatsRepository::new(pool, config.database.query_timeout);

    Ok((config, repo))
}
