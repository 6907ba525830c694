use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DEFAULT_PAYMENT_METHOD: &str = "qr_code";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PaymentStatus {
    Completed,
    Pending,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub course_id: String,
    pub student_id: String,
    pub student_name: String,
    pub amount: f64,
    pub status: PaymentStatus,
    pub payment_method: String,
    pub payment_date: String,
    pub transaction_id: String,
    pub notes: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPaymentRequest {
    pub course_id: String,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentQuery {
    pub course_id: Option<String>,
    pub student_id: Option<String>,
    pub status: Option<PaymentStatus>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub total_revenue: f64,
    pub pending_payments: usize,
    pub payments: Vec<Payment>,
}

impl PaymentSummary {
    /// Revenue and pending count cover every payment; `filter` only narrows
    /// the returned list.
    pub fn build(payments: Vec<Payment>, filter: Option<PaymentStatus>) -> Self {
        let total_revenue = payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Completed)
            .map(|p| p.amount)
            .sum();
        let pending_payments = payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Pending)
            .count();
        let payments = match filter {
            Some(status) => payments.into_iter().filter(|p| p.status == status).collect(),
            None => payments,
        };

        Self {
            total_revenue,
            pending_payments,
            payments,
        }
    }
}
