use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TeacherProfile {
    pub id: String,
    pub teacher_id: String,
    pub teacher_name: String,
    pub email: String,
    pub avatar: String,
    pub bio: String,
    #[sqlx(json)]
    pub expertise: Vec<String>,
    pub experience: String,
    pub education: String,
    #[sqlx(json)]
    pub certifications: Vec<String>,
    #[sqlx(json)]
    pub social_links: BTreeMap<String, String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Figures derived from the teacher's courses at read time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TeacherStats {
    pub courses_taught: i64,
    pub total_students: i64,
    pub average_rating: f64,
    pub total_reviews: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeacherProfileView {
    #[serde(flatten)]
    pub profile: TeacherProfile,
    #[serde(flatten)]
    pub stats: TeacherStats,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpsertTeacherProfileRequest {
    pub teacher_name: Option<String>,
    pub email: Option<String>,
    pub avatar: String,
    pub bio: String,
    pub expertise: Vec<String>,
    pub experience: String,
    pub education: String,
    pub certifications: Vec<String>,
    pub social_links: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherProfileQuery {
    pub teacher_id: Option<String>,
}
