use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum CourseStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl CourseStatus {
    pub fn for_dates(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Self {
        if today < start {
            CourseStatus::NotStarted
        } else if today <= end {
            CourseStatus::InProgress
        } else {
            CourseStatus::Completed
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    pub teacher: String,
    pub teacher_id: String,
    pub category: String,
    pub price: f64,
    pub duration: String,
    pub max_students: Option<i64>,
    pub students: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub level: String,
    pub status: CourseStatus,
    pub image: String,
    pub qr_code: String,
    pub rating: f64,
    pub reviews: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl Course {
    pub fn is_full(&self) -> bool {
        self.max_students.is_some_and(|max| self.students >= max)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewCourseRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub duration: String,
    pub max_students: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub level: Option<String>,
    pub image: String,
    pub qr_code: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub duration: Option<String>,
    /// `null` clears the capacity, an absent field leaves it unchanged.
    #[serde(default, deserialize_with = "double_option")]
    pub max_students: Option<Option<i64>>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub level: Option<String>,
    pub image: Option<String>,
    pub qr_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub teacher_id: Option<String>,
}

fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_status_for_dates() {
        let start = date("2025-03-01");
        let end = date("2025-05-30");
        assert_eq!(CourseStatus::for_dates(start, end, date("2025-02-28")), CourseStatus::NotStarted);
        assert_eq!(CourseStatus::for_dates(start, end, start), CourseStatus::InProgress);
        assert_eq!(CourseStatus::for_dates(start, end, end), CourseStatus::InProgress);
        assert_eq!(CourseStatus::for_dates(start, end, date("2025-05-31")), CourseStatus::Completed);
    }

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&CourseStatus::NotStarted).unwrap();
        assert_eq!(json, "\"not-started\"");
    }

    #[test]
    fn test_update_max_students_null_vs_absent() {
        let cleared: UpdateCourseRequest = serde_json::from_str(r#"{"maxStudents": null}"#).unwrap();
        assert_eq!(cleared.max_students, Some(None));

        let absent: UpdateCourseRequest = serde_json::from_str(r#"{"title": "x"}"#).unwrap();
        assert_eq!(absent.max_students, None);

        let set: UpdateCourseRequest = serde_json::from_str(r#"{"maxStudents": 20}"#).unwrap();
        assert_eq!(set.max_students, Some(Some(20)));
    }
}
