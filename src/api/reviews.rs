use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::auth::AuthUser;
use crate::db::reviews;
use crate::error::AppError;
use crate::models::{Review, ReviewQuery, SubmitReviewRequest};
use crate::services::ReviewService;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/courseReviews", get(list_reviews).post(submit_review))
        .route("/courseReviews/{id}", get(get_review).delete(delete_review))
}

async fn list_reviews(State(state): State<AppState>, Query(query): Query<ReviewQuery>) -> Result<Json<Vec<Review>>, AppError> {
    Ok(Json(reviews::list_reviews(&state.db, &query).await?))
}

async fn get_review(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Review>, AppError> {
    let review = reviews::find_review_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound("Review not found"))?;
    Ok(Json(review))
}

async fn submit_review(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(req): Json<SubmitReviewRequest>,
) -> Result<Json<Review>, AppError> {
    Ok(Json(ReviewService::new(state.db).submit(&caller, req).await?))
}

async fn delete_review(State(state): State<AppState>, caller: AuthUser, Path(id): Path<String>) -> Result<StatusCode, AppError> {
    ReviewService::new(state.db).delete(&caller, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
