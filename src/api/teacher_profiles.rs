use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::{TeacherProfileQuery, TeacherProfileView, UpsertTeacherProfileRequest};
use crate::services::TeacherProfileService;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/teacherProfiles", get(list_profiles))
        .route("/teacherProfiles/me", put(upsert_my_profile))
        .route("/teacherProfiles/{id}", get(get_profile))
}

async fn list_profiles(
    State(state): State<AppState>,
    Query(query): Query<TeacherProfileQuery>,
) -> Result<Json<Vec<TeacherProfileView>>, AppError> {
    Ok(Json(TeacherProfileService::new(state.db).list(&query).await?))
}

async fn get_profile(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<TeacherProfileView>, AppError> {
    Ok(Json(TeacherProfileService::new(state.db).get(&id).await?))
}

async fn upsert_my_profile(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(req): Json<UpsertTeacherProfileRequest>,
) -> Result<Json<TeacherProfileView>, AppError> {
    Ok(Json(TeacherProfileService::new(state.db).upsert(&caller, req).await?))
}
