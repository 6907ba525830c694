mod applications;
mod auth;
mod courses;
mod enrollments;
mod favorites;
mod homework;
mod lessons;
mod payments;
mod reviews;
mod teacher_profiles;
mod users;

use axum::{Router, extract::State, http::StatusCode, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(auth::routes())
        .merge(users::routes())
        .merge(favorites::routes())
        .merge(courses::routes())
        .merge(enrollments::routes())
        .merge(lessons::routes())
        .merge(homework::routes())
        .merge(reviews::routes())
        .merge(applications::routes())
        .merge(payments::routes())
        .merge(teacher_profiles::routes());

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}
