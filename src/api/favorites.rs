use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::{AddFavoriteRequest, FavoriteChange, FavoriteCheck, FavoriteList};
use crate::services::FavoriteService;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/favorites", get(list_favorites).post(add_favorite))
        .route("/favorites/{course_id}", get(check_favorite).delete(remove_favorite))
}

async fn list_favorites(State(state): State<AppState>, caller: AuthUser) -> Result<Json<FavoriteList>, AppError> {
    let favorites = FavoriteService::new(state.db).list(&caller).await?;
    Ok(Json(FavoriteList { favorites }))
}

async fn add_favorite(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(req): Json<AddFavoriteRequest>,
) -> Result<Json<FavoriteChange>, AppError> {
    Ok(Json(FavoriteService::new(state.db).add(&caller, req).await?))
}

async fn check_favorite(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(course_id): Path<String>,
) -> Result<Json<FavoriteCheck>, AppError> {
    let is_favorite = FavoriteService::new(state.db).is_favorite(&caller, &course_id).await?;
    Ok(Json(FavoriteCheck { is_favorite }))
}

async fn remove_favorite(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(course_id): Path<String>,
) -> Result<Json<FavoriteChange>, AppError> {
    Ok(Json(FavoriteService::new(state.db).remove(&caller, &course_id).await?))
}
