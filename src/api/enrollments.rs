use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::auth::AuthUser;
use crate::db::enrollments;
use crate::error::AppError;
use crate::models::{Enrollment, EnrollmentCheck, EnrollmentQuery, NewEnrollmentRequest};
use crate::services::EnrollmentService;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/enrollments", get(list_enrollments).post(enroll))
        .route("/enrollments/check/{course_id}", get(check_enrollment))
        .route("/enrollments/{id}", get(get_enrollment).delete(unenroll))
        .route("/enrollments/{id}/lessons/{lesson_id}/toggle", post(toggle_lesson))
}

async fn list_enrollments(
    State(state): State<AppState>,
    _caller: AuthUser,
    Query(query): Query<EnrollmentQuery>,
) -> Result<Json<Vec<Enrollment>>, AppError> {
    Ok(Json(enrollments::list_enrollments(&state.db, &query).await?))
}

async fn get_enrollment(State(state): State<AppState>, _caller: AuthUser, Path(id): Path<String>) -> Result<Json<Enrollment>, AppError> {
    Ok(Json(EnrollmentService::new(state.db).get(&id).await?))
}

async fn enroll(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(req): Json<NewEnrollmentRequest>,
) -> Result<(StatusCode, Json<Enrollment>), AppError> {
    let enrollment = EnrollmentService::new(state.db).enroll(&caller, req).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

async fn check_enrollment(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(course_id): Path<String>,
) -> Result<Json<EnrollmentCheck>, AppError> {
    let is_enrolled = EnrollmentService::new(state.db).is_enrolled(&caller, &course_id).await?;
    Ok(Json(EnrollmentCheck { is_enrolled }))
}

async fn unenroll(State(state): State<AppState>, caller: AuthUser, Path(id): Path<String>) -> Result<StatusCode, AppError> {
    EnrollmentService::new(state.db).unenroll(&caller, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_lesson(
    State(state): State<AppState>,
    caller: AuthUser,
    Path((id, lesson_id)): Path<(String, String)>,
) -> Result<Json<Enrollment>, AppError> {
    Ok(Json(EnrollmentService::new(state.db).toggle_lesson(&caller, &id, &lesson_id).await?))
}
