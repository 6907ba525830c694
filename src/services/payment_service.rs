use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::auth::AuthUser;
use crate::db::{self, courses, payments, users};
use crate::error::AppError;
use crate::models::payment::DEFAULT_PAYMENT_METHOD;
use crate::models::{NewPaymentRequest, Payment, PaymentStatus, PaymentSummary, Role};

pub struct PaymentService {
    db: SqlitePool,
}

impl PaymentService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Records a completed payment of the course's current price.
    pub async fn pay(&self, caller: &AuthUser, req: NewPaymentRequest) -> Result<Payment, AppError> {
        caller.require_role(Role::Student)?;

        let mut tx = self.db.begin().await?;
        let course = courses::find_course_by_id(&mut *tx, &req.course_id)
            .await?
            .ok_or(AppError::NotFound("Course not found"))?;
        if payments::has_completed_payment(&mut *tx, &course.id, &caller.id).await? {
            return Err(AppError::Conflict("You have already paid for this course".to_string()));
        }
        let student = users::find_user_by_id(&mut *tx, &caller.id)
            .await?
            .ok_or(AppError::NotFound("User not found"))?;

        let payment = Payment {
            id: db::new_id(),
            course_id: course.id,
            student_id: student.id,
            student_name: student.name,
            amount: course.price,
            status: PaymentStatus::Completed,
            payment_method: req
                .payment_method
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
            payment_date: db::now(),
            transaction_id: transaction_id(),
            notes: req.notes.unwrap_or_default(),
        };
        payments::insert_payment(&mut *tx, &payment)
            .await
            .map_err(|e| AppError::conflict_on_unique(e, "You have already paid for this course"))?;
        tx.commit().await?;

        info!("payment {} of {} for course {}", payment.transaction_id, payment.amount, payment.course_id);
        Ok(payment)
    }

    pub async fn teacher_summary(&self, caller: &AuthUser, filter: Option<PaymentStatus>) -> Result<PaymentSummary, AppError> {
        caller.require_role(Role::Teacher)?;
        let payments = payments::payments_for_teacher(&self.db, &caller.id).await?;
        Ok(PaymentSummary::build(payments, filter))
    }
}

fn transaction_id() -> String {
    format!("TXN_{}", Utc::now().timestamp_millis())
}
