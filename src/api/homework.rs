use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};

use crate::auth::AuthUser;
use crate::db::homework;
use crate::error::AppError;
use crate::models::{GradeHomeworkRequest, Homework, HomeworkQuery, SubmitHomeworkRequest};
use crate::services::HomeworkService;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/homework", get(list_homework).post(submit_homework))
        .route("/homework/{id}", get(get_homework))
        .route("/homework/{id}/grade", put(grade_homework))
}

async fn list_homework(
    State(state): State<AppState>,
    _caller: AuthUser,
    Query(query): Query<HomeworkQuery>,
) -> Result<Json<Vec<Homework>>, AppError> {
    Ok(Json(homework::list_homework(&state.db, &query).await?))
}

async fn get_homework(State(state): State<AppState>, _caller: AuthUser, Path(id): Path<String>) -> Result<Json<Homework>, AppError> {
    let submission = homework::find_homework_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound("Homework not found"))?;
    Ok(Json(submission))
}

async fn submit_homework(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(req): Json<SubmitHomeworkRequest>,
) -> Result<(StatusCode, Json<Homework>), AppError> {
    let submission = HomeworkService::new(state.db).submit(&caller, req).await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

async fn grade_homework(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<GradeHomeworkRequest>,
) -> Result<Json<Homework>, AppError> {
    Ok(Json(HomeworkService::new(state.db).grade(&caller, &id, req).await?))
}
