use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum LessonType {
    #[default]
    Recorded,
    Live,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub course_id: String,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub broadcast_url: String,
    pub duration: String,
    pub scheduled_date: Option<String>,
    pub scheduled_time: Option<String>,
    pub homework_description: String,
    #[sqlx(json)]
    pub homework_requirements: Vec<String>,
    pub lesson_type: LessonType,
    #[sqlx(rename = "lesson_order")]
    pub order: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewLessonRequest {
    pub course_id: String,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub broadcast_url: String,
    pub duration: String,
    pub scheduled_date: Option<String>,
    pub scheduled_time: Option<String>,
    pub homework_description: String,
    pub homework_requirements: Vec<String>,
    pub lesson_type: LessonType,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLessonRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub broadcast_url: Option<String>,
    pub duration: Option<String>,
    pub scheduled_date: Option<String>,
    pub scheduled_time: Option<String>,
    pub homework_description: Option<String>,
    pub homework_requirements: Option<Vec<String>>,
    pub lesson_type: Option<LessonType>,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonQuery {
    pub course_id: Option<String>,
}

/// Drops blank entries and trims the rest.
pub fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
