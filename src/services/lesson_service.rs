use sqlx::SqlitePool;
use tracing::info;

use crate::auth::AuthUser;
use crate::db::{self, enrollments, lessons};
use crate::error::AppError;
use crate::models::enrollment::progress_percent;
use crate::models::lesson::clean_list;
use crate::models::{EnrollmentQuery, Lesson, NewLessonRequest, UpdateLessonRequest};
use crate::services::course_service::owned_course;

pub struct LessonService {
    db: SqlitePool,
}

impl LessonService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn get(&self, id: &str) -> Result<Lesson, AppError> {
        lessons::find_lesson_by_id(&self.db, id)
            .await?
            .ok_or(AppError::NotFound("Lesson not found"))
    }

    pub async fn create(&self, caller: &AuthUser, req: NewLessonRequest) -> Result<Lesson, AppError> {
        let title = req.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::BadRequest("Please enter a lesson title".to_string()));
        }

        let mut tx = self.db.begin().await?;
        let course = owned_course(&mut *tx, &req.course_id, caller).await?;

        let lesson = Lesson {
            id: db::new_id(),
            course_id: course.id,
            title,
            description: req.description,
            video_url: req.video_url,
            broadcast_url: req.broadcast_url,
            duration: req.duration,
            scheduled_date: req.scheduled_date,
            scheduled_time: req.scheduled_time,
            homework_description: req.homework_description,
            homework_requirements: clean_list(req.homework_requirements),
            lesson_type: req.lesson_type,
            order: lessons::next_order(&mut *tx, &req.course_id).await?,
            created_at: db::now(),
        };
        lessons::insert_lesson(&mut *tx, &lesson).await?;
        tx.commit().await?;

        info!("lesson {} added to course {} at #{}", lesson.id, lesson.course_id, lesson.order);
        Ok(lesson)
    }

    pub async fn update(&self, caller: &AuthUser, id: &str, req: UpdateLessonRequest) -> Result<Lesson, AppError> {
        let mut lesson = self.get(id).await?;
        owned_course(&self.db, &lesson.course_id, caller).await?;

        if let Some(title) = req.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(AppError::BadRequest("Please enter a lesson title".to_string()));
            }
            lesson.title = title;
        }
        if let Some(description) = req.description {
            lesson.description = description;
        }
        if let Some(video_url) = req.video_url {
            lesson.video_url = video_url;
        }
        if let Some(broadcast_url) = req.broadcast_url {
            lesson.broadcast_url = broadcast_url;
        }
        if let Some(duration) = req.duration {
            lesson.duration = duration;
        }
        if let Some(scheduled_date) = req.scheduled_date {
            lesson.scheduled_date = Some(scheduled_date).filter(|d| !d.is_empty());
        }
        if let Some(scheduled_time) = req.scheduled_time {
            lesson.scheduled_time = Some(scheduled_time).filter(|t| !t.is_empty());
        }
        if let Some(homework_description) = req.homework_description {
            lesson.homework_description = homework_description;
        }
        if let Some(requirements) = req.homework_requirements {
            lesson.homework_requirements = clean_list(requirements);
        }
        if let Some(lesson_type) = req.lesson_type {
            lesson.lesson_type = lesson_type;
        }
        if let Some(order) = req.order {
            if order < 1 {
                return Err(AppError::BadRequest("Lesson order must be at least 1".to_string()));
            }
            lesson.order = order;
        }

        lessons::update_lesson(&self.db, &lesson).await?;
        Ok(lesson)
    }

    /// Removes the lesson and drops it from every enrollment's completed list,
    /// recomputing progress against the lessons that remain.
    pub async fn delete(&self, caller: &AuthUser, id: &str) -> Result<(), AppError> {
        let mut tx = self.db.begin().await?;
        let lesson = lessons::find_lesson_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Lesson not found"))?;
        owned_course(&mut *tx, &lesson.course_id, caller).await?;

        lessons::delete_lesson(&mut *tx, id).await?;
        let remaining = lessons::lesson_ids(&mut *tx, &lesson.course_id).await?;

        let query = EnrollmentQuery {
            course_id: Some(lesson.course_id.clone()),
            student_id: None,
        };
        let affected = enrollments::list_enrollments(&mut *tx, &query).await?;
        for mut enrollment in affected {
            enrollment.completed_lessons.retain(|l| remaining.contains(l));
            let progress = progress_percent(enrollment.completed_lessons.len(), remaining.len());
            enrollments::update_progress(&mut *tx, &enrollment.id, &enrollment.completed_lessons, progress).await?;
        }
        tx.commit().await?;

        info!("lesson {} removed from course {}", id, lesson.course_id);
        Ok(())
    }
}
