use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};

use crate::auth::AuthUser;
use crate::db::users;
use crate::error::AppError;
use crate::models::{ChangePasswordRequest, UpdateUserRequest, User, UserQuery};
use crate::services::AuthService;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/users/{id}/password", put(change_password))
}

fn service(state: &AppState) -> AuthService {
    AuthService::new(state.db.clone(), state.config.clone(), state.tokens.clone())
}

async fn list_users(
    State(state): State<AppState>,
    _caller: AuthUser,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(users::list_users(&state.db, &query).await?))
}

async fn get_user(State(state): State<AppState>, _caller: AuthUser, Path(id): Path<String>) -> Result<Json<User>, AppError> {
    let user = users::find_user_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound("User not found"))?;
    Ok(Json(user))
}

async fn update_user(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    Ok(Json(service(&state).update_user(&caller, &id, req).await?))
}

async fn change_password(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    service(&state).change_password(&caller, &id, req).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_user(State(state): State<AppState>, caller: AuthUser, Path(id): Path<String>) -> Result<StatusCode, AppError> {
    service(&state).delete_user(&caller, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
