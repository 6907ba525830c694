use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub course_id: String,
    pub student_id: String,
    pub student_name: String,
    pub rating: i64,
    pub review: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReviewRequest {
    pub course_id: String,
    pub rating: i64,
    #[serde(default)]
    pub review: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewQuery {
    pub course_id: Option<String>,
    pub student_id: Option<String>,
}

/// Aggregate written back onto a course after its reviews change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingSummary {
    pub rating: f64,
    pub reviews: i64,
}

impl RatingSummary {
    pub fn from_ratings(ratings: &[i64]) -> Self {
        if ratings.is_empty() {
            return Self { rating: 0.0, reviews: 0 };
        }
        let total: i64 = ratings.iter().sum();
        let average = total as f64 / ratings.len() as f64;
        Self {
            rating: round_one_decimal(average),
            reviews: ratings.len() as i64,
        }
    }
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_summary() {
        assert_eq!(
            RatingSummary::from_ratings(&[]),
            RatingSummary { rating: 0.0, reviews: 0 }
        );
        assert_eq!(
            RatingSummary::from_ratings(&[5, 4, 4]),
            RatingSummary { rating: 4.3, reviews: 3 }
        );
        assert_eq!(
            RatingSummary::from_ratings(&[5, 4]),
            RatingSummary { rating: 4.5, reviews: 2 }
        );
    }
}
