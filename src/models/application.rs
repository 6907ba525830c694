use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub course_id: String,
    pub student_id: String,
    pub student_name: String,
    pub student_email: String,
    pub phone_number: String,
    pub message: String,
    pub status: ApplicationStatus,
    pub applied_at: String,
    pub reviewed_at: Option<String>,
    pub teacher_response: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplicationRequest {
    pub course_id: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewApplicationRequest {
    pub status: ApplicationStatus,
    #[serde(default)]
    pub teacher_response: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationQuery {
    pub course_id: Option<String>,
    pub student_id: Option<String>,
    pub status: Option<ApplicationStatus>,
}
