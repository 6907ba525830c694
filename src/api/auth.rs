use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, User};
use crate::services::AuthService;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile", get(profile))
}

fn service(state: &AppState) -> AuthService {
    AuthService::new(state.db.clone(), state.config.clone(), state.tokens.clone())
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let response = service(&state).register(req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Result<Json<AuthResponse>, AppError> {
    Ok(Json(service(&state).login(req).await?))
}

async fn profile(State(state): State<AppState>, caller: AuthUser) -> Result<Json<User>, AppError> {
    Ok(Json(service(&state).profile(&caller).await?))
}
