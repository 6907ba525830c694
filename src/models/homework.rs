use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum HomeworkStatus {
    Submitted,
    Graded,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Homework {
    pub id: String,
    pub enrollment_id: String,
    pub lesson_id: String,
    pub course_id: String,
    pub student_id: String,
    pub github_link: String,
    pub submitted_at: String,
    pub grade: Option<i64>,
    pub feedback: Option<String>,
    pub status: HomeworkStatus,
    pub graded_by: Option<String>,
    pub graded_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitHomeworkRequest {
    pub enrollment_id: String,
    pub lesson_id: String,
    pub github_link: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GradeHomeworkRequest {
    pub grade: i64,
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeworkQuery {
    pub course_id: Option<String>,
    pub enrollment_id: Option<String>,
    pub lesson_id: Option<String>,
}

pub fn is_valid_link(link: &str) -> bool {
    let link = link.trim();
    let rest = link
        .strip_prefix("https://")
        .or_else(|| link.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty() && !host.contains(char::is_whitespace))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_link() {
        assert!(is_valid_link("https://github.com/ann/hw1"));
        assert!(is_valid_link("http://example.com"));
        assert!(!is_valid_link("github.com/ann/hw1"));
        assert!(!is_valid_link("https://"));
        assert!(!is_valid_link("https://git hub.com"));
    }
}
