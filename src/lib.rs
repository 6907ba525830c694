pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;

use axum::Router;

use crate::config::Config;
use crate::error::AppError;
use crate::state::AppState;

/// Connects the database, runs migrations and returns the state and router.
pub async fn build_app(config: Config) -> Result<(AppState, Router), AppError> {
    let pool = db::connect(&config).await?;
    let state = AppState::new(pool, config);
    let app = api::router(state.clone());
    Ok((state, app))
}
