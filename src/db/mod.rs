pub mod applications;
pub mod courses;
pub mod enrollments;
pub mod favorites;
pub mod homework;
pub mod lessons;
pub mod payments;
pub mod reviews;
pub mod teacher_profiles;
pub mod users;

use std::str::FromStr;

use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Opens the pool (creating the file if needed) and brings the schema up to date.
pub async fn connect(config: &Config) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect_with(options)
        .await?;

    MIGRATOR.run(&pool).await?;
    info!("database ready at {}", config.database_url);

    Ok(pool)
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn now() -> String {
    Utc::now().to_rfc3339()
}
