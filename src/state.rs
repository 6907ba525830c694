use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::token::TokenKeys;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<Config>,
    pub tokens: Arc<TokenKeys>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: Config) -> Self {
        let tokens = TokenKeys::new(&config.jwt_secret, config.token_ttl_hours);
        Self {
            db,
            config: Arc::new(config),
            tokens: Arc::new(tokens),
        }
    }
}
