use sqlx::mysql::MySqlConnectOptions;
use std::{net::IpAddr, str::FromStr, time::Duration};
use tracing::info;

use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub database: DatabaseConfig,
    pub cors_allowed_origins: Vec<String>,
}

/// Where the stats database lives and how hard we are allowed to lean on it
#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub pool_size: u32,
    pub acquire_timeout: Duration,
    pub query_timeout: Duration,
}

// Keeps credentials out of logs
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("name", &self.name)
            .field("pool_size", &self.pool_size)
            .field("acquire_timeout", &self.acquire_timeout)
            .field("query_timeout", &self.query_timeout)
            .finish()
    }
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> Result<MySqlConnectOptions, ConfigError> {
        if let Some(url) = &self.url {
            return MySqlConnectOptions::from_str(url).map_err(ConfigError::DatabaseUrl);
        }

        Ok(MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .charset("utf8mb4"))
    }
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let url = var("DATABASE_URL");
        let user = match (&url, var("DB_USER")) {
            (_, Some(user)) => user,
            (Some(_), None) => String::new(),
            (None, None) => return Err(ConfigError::Missing("DB_USER")),
        };

        let database = DatabaseConfig {
            url,
            host: var("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
            port: parse_or(&var, "DB_PORT", 3306)?,
            user,
            password: lookup("DB_PASSWORD").unwrap_or_default(),
            name: var("DB_NAME").unwrap_or_else(|| "NHL_API".to_string()),
            pool_size: parse_or(&var, "DB_POOL_SIZE", 10)?,
            acquire_timeout: Duration::from_secs(parse_or(&var, "DB_ACQUIRE_TIMEOUT_SECS", 5)?),
            query_timeout: Duration::from_secs(parse_or(&var, "QUERY_TIMEOUT_SECS", 10)?),
        };

        if database.pool_size == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_POOL_SIZE",
                value: "0".to_string(),
            });
        }

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        Ok(Self {
            host: parse_or(&var, "HOST", IpAddr::from([0, 0, 0, 0]))?,
            port: parse_or(&var, "PORT", 3001)?,
            database,
            cors_allowed_origins,
        })
    }
}

fn parse_or<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match var(key) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { key, value }),
        None => {
            info!("{key} not set, using default");
            Ok(default)
        }
    }
}
