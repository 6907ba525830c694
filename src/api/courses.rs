use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::auth::AuthUser;
use crate::db::courses;
use crate::error::AppError;
use crate::models::{Course, CourseQuery, NewCourseRequest, UpdateCourseRequest};
use crate::services::CourseService;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses).post(create_course))
        .route("/courses/{id}", get(get_course).put(update_course).delete(delete_course))
}

async fn list_courses(State(state): State<AppState>, Query(query): Query<CourseQuery>) -> Result<Json<Vec<Course>>, AppError> {
    Ok(Json(courses::list_courses(&state.db, &query).await?))
}

async fn get_course(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Course>, AppError> {
    let course = courses::find_course_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound("Course not found"))?;
    Ok(Json(course))
}

async fn create_course(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(req): Json<NewCourseRequest>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let course = CourseService::new(state.db).create(&caller, req).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

async fn update_course(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateCourseRequest>,
) -> Result<Json<Course>, AppError> {
    Ok(Json(CourseService::new(state.db).update(&caller, &id, req).await?))
}

async fn delete_course(State(state): State<AppState>, caller: AuthUser, Path(id): Path<String>) -> Result<StatusCode, AppError> {
    CourseService::new(state.db).delete(&caller, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
