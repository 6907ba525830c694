use std::{env, fmt::Display, net::SocketAddr, str::FromStr};

use tracing::{info, warn};

use crate::error::AppError;

const DEV_JWT_SECRET: &str = "coursehub-dev-secret-change-me";

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub status_refresh_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET is not set, using the development secret");
            DEV_JWT_SECRET.to_string()
        });

        Ok(Self {
            host: try_load("HOST", "127.0.0.1")?,
            port: try_load("PORT", "5000")?,
            database_url: try_load("DATABASE_URL", "sqlite://coursehub.db")?,
            db_max_connections: try_load("DB_MAX_CONNECTIONS", "5")?,
            jwt_secret,
            token_ttl_hours: try_load("TOKEN_TTL_HOURS", "24")?,
            bcrypt_cost: try_load("BCRYPT_COST", "10")?,
            status_refresh_secs: try_load("STATUS_REFRESH_SECS", "3600")?,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Internal(format!("invalid HOST/PORT: {}", e)))
    }

    /// Settings for tests: in-memory database and the minimum bcrypt cost.
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url: "sqlite::memory:".to_string(),
            db_max_connections: 1,
            jwt_secret: "test-secret".to_string(),
            token_ttl_hours: 24,
            bcrypt_cost: 4,
            status_refresh_secs: 3600,
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, AppError>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e| AppError::Internal(format!("invalid {key} value: {e}")))
}
