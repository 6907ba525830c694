use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};

use crate::auth::AuthUser;
use crate::db::applications;
use crate::error::AppError;
use crate::models::{Application, ApplicationQuery, NewApplicationRequest, ReviewApplicationRequest};
use crate::services::ApplicationService;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/courseApplications", get(list_applications).post(apply))
        .route("/courseApplications/{id}", get(get_application))
        .route("/courseApplications/{id}/review", put(review_application))
}

async fn list_applications(
    State(state): State<AppState>,
    _caller: AuthUser,
    Query(query): Query<ApplicationQuery>,
) -> Result<Json<Vec<Application>>, AppError> {
    Ok(Json(applications::list_applications(&state.db, &query).await?))
}

async fn get_application(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Application>, AppError> {
    let application = applications::find_application_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound("Application not found"))?;
    Ok(Json(application))
}

async fn apply(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(req): Json<NewApplicationRequest>,
) -> Result<(StatusCode, Json<Application>), AppError> {
    let application = ApplicationService::new(state.db).apply(&caller, req).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

async fn review_application(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<ReviewApplicationRequest>,
) -> Result<Json<Application>, AppError> {
    Ok(Json(ApplicationService::new(state.db).review(&caller, &id, req).await?))
}
