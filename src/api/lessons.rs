use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::auth::AuthUser;
use crate::db::lessons;
use crate::error::AppError;
use crate::models::{Lesson, LessonQuery, NewLessonRequest, UpdateLessonRequest};
use crate::services::LessonService;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/lessons", get(list_lessons).post(create_lesson))
        .route("/lessons/{id}", get(get_lesson).put(update_lesson).delete(delete_lesson))
}

async fn list_lessons(State(state): State<AppState>, Query(query): Query<LessonQuery>) -> Result<Json<Vec<Lesson>>, AppError> {
    Ok(Json(lessons::list_lessons(&state.db, query.course_id.as_deref()).await?))
}

async fn get_lesson(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Lesson>, AppError> {
    Ok(Json(LessonService::new(state.db).get(&id).await?))
}

async fn create_lesson(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(req): Json<NewLessonRequest>,
) -> Result<(StatusCode, Json<Lesson>), AppError> {
    let lesson = LessonService::new(state.db).create(&caller, req).await?;
    Ok((StatusCode::CREATED, Json(lesson)))
}

async fn update_lesson(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateLessonRequest>,
) -> Result<Json<Lesson>, AppError> {
    Ok(Json(LessonService::new(state.db).update(&caller, &id, req).await?))
}

async fn delete_lesson(State(state): State<AppState>, caller: AuthUser, Path(id): Path<String>) -> Result<StatusCode, AppError> {
    LessonService::new(state.db).delete(&caller, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
