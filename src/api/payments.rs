use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::db::payments;
use crate::error::AppError;
use crate::models::{NewPaymentRequest, Payment, PaymentQuery, PaymentStatus, PaymentSummary, Role};
use crate::services::PaymentService;
use crate::state::AppState;

#[derive(Deserialize)]
struct SummaryParams {
    status: Option<PaymentStatus>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(list_payments).post(pay))
        .route("/payments/summary", get(summary))
        .route("/payments/{id}", get(get_payment))
}

/// Students only ever see their own payments.
async fn list_payments(
    State(state): State<AppState>,
    caller: AuthUser,
    Query(mut query): Query<PaymentQuery>,
) -> Result<Json<Vec<Payment>>, AppError> {
    if caller.role == Role::Student {
        query.student_id = Some(caller.id);
    }
    Ok(Json(payments::list_payments(&state.db, &query).await?))
}

async fn get_payment(State(state): State<AppState>, caller: AuthUser, Path(id): Path<String>) -> Result<Json<Payment>, AppError> {
    let payment = payments::find_payment_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound("Payment not found"))?;
    if caller.role == Role::Student && payment.student_id != caller.id {
        return Err(AppError::Forbidden("You can only view your own payments".to_string()));
    }
    Ok(Json(payment))
}

async fn pay(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(req): Json<NewPaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), AppError> {
    let payment = PaymentService::new(state.db).pay(&caller, req).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

async fn summary(
    State(state): State<AppState>,
    caller: AuthUser,
    Query(params): Query<SummaryParams>,
) -> Result<Json<PaymentSummary>, AppError> {
    Ok(Json(PaymentService::new(state.db).teacher_summary(&caller, params.status).await?))
}
