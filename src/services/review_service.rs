use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use crate::auth::AuthUser;
use crate::db::{self, courses, enrollments, reviews, users};
use crate::error::AppError;
use crate::models::{RatingSummary, Review, Role, SubmitReviewRequest};

pub struct ReviewService {
    db: SqlitePool,
}

impl ReviewService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Creates the caller's review of a course, or updates it if one exists,
    /// and refreshes the course rating in the same transaction.
    pub async fn submit(&self, caller: &AuthUser, req: SubmitReviewRequest) -> Result<Review, AppError> {
        caller.require_role(Role::Student)?;
        if !(1..=5).contains(&req.rating) {
            return Err(AppError::BadRequest("Rating must be between 1 and 5".to_string()));
        }
        let text = req.review.trim();
        if text.is_empty() {
            return Err(AppError::BadRequest("Please write a review".to_string()));
        }

        let mut tx = self.db.begin().await?;
        courses::find_course_by_id(&mut *tx, &req.course_id)
            .await?
            .ok_or(AppError::NotFound("Course not found"))?;
        if enrollments::find_enrollment(&mut *tx, &req.course_id, &caller.id)
            .await?
            .is_none()
        {
            return Err(AppError::Forbidden("Only enrolled students can review this course".to_string()));
        }
        let student = users::find_user_by_id(&mut *tx, &caller.id)
            .await?
            .ok_or(AppError::NotFound("User not found"))?;

        let now = db::now();
        let review = match reviews::find_review(&mut *tx, &req.course_id, &caller.id).await? {
            Some(mut existing) => {
                existing.rating = req.rating;
                existing.review = text.to_string();
                existing.student_name = student.name;
                existing.updated_at = now;
                reviews::update_review(&mut *tx, &existing).await?;
                existing
            }
            None => {
                let created = Review {
                    id: db::new_id(),
                    course_id: req.course_id.clone(),
                    student_id: caller.id.clone(),
                    student_name: student.name,
                    rating: req.rating,
                    review: text.to_string(),
                    created_at: now.clone(),
                    updated_at: now,
                };
                reviews::insert_review(&mut *tx, &created)
                    .await
                    .map_err(|e| AppError::conflict_on_unique(e, "You have already reviewed this course"))?;
                created
            }
        };

        recompute_rating(&mut tx, &review.course_id).await?;
        tx.commit().await?;

        info!("review {} saved for course {}", review.id, review.course_id);
        Ok(review)
    }

    pub async fn delete(&self, caller: &AuthUser, id: &str) -> Result<(), AppError> {
        let mut tx = self.db.begin().await?;
        let review = reviews::find_review_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Review not found"))?;
        if review.student_id != caller.id {
            return Err(AppError::Forbidden("You can only delete your own reviews".to_string()));
        }

        reviews::delete_review(&mut *tx, id).await?;
        recompute_rating(&mut tx, &review.course_id).await?;
        tx.commit().await?;
        Ok(())
    }
}

pub(crate) async fn recompute_rating(conn: &mut SqliteConnection, course_id: &str) -> Result<RatingSummary, AppError> {
    let ratings = reviews::ratings_for_course(&mut *conn, course_id).await?;
    let summary = RatingSummary::from_ratings(&ratings);
    courses::set_rating(&mut *conn, course_id, summary).await?;
    Ok(summary)
}
