use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use crate::auth::AuthUser;
use crate::db::{self, courses, enrollments, lessons};
use crate::error::AppError;
use crate::models::enrollment::{is_valid_phone, progress_percent};
use crate::models::{Enrollment, EnrollmentStatus, NewEnrollmentRequest, Role};

pub struct EnrollmentService {
    db: SqlitePool,
}

impl EnrollmentService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn enroll(&self, caller: &AuthUser, req: NewEnrollmentRequest) -> Result<Enrollment, AppError> {
        caller.require_role(Role::Student)?;

        let full_name = req.full_name.trim();
        if full_name.is_empty() {
            return Err(AppError::BadRequest("Full name is required".to_string()));
        }
        if !is_valid_phone(&req.phone_number) {
            return Err(AppError::BadRequest("Please enter a valid phone number".to_string()));
        }

        let mut tx = self.db.begin().await?;
        courses::find_course_by_id(&mut *tx, &req.course_id)
            .await?
            .ok_or(AppError::NotFound("Course not found"))?;

        if enrollments::find_enrollment(&mut *tx, &req.course_id, &caller.id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Already enrolled in this course".to_string()));
        }

        let enrollment = create_enrollment(
            &mut tx,
            &req.course_id,
            &caller.id,
            full_name,
            req.phone_number.trim(),
        )
        .await?;
        tx.commit().await?;

        info!("student {} enrolled in course {}", caller.id, req.course_id);
        Ok(enrollment)
    }

    pub async fn get(&self, id: &str) -> Result<Enrollment, AppError> {
        enrollments::find_enrollment_by_id(&self.db, id)
            .await?
            .ok_or(AppError::NotFound("Enrollment not found"))
    }

    pub async fn is_enrolled(&self, caller: &AuthUser, course_id: &str) -> Result<bool, AppError> {
        Ok(enrollments::find_enrollment(&self.db, course_id, &caller.id)
            .await?
            .is_some())
    }

    pub async fn unenroll(&self, caller: &AuthUser, id: &str) -> Result<(), AppError> {
        let mut tx = self.db.begin().await?;
        let enrollment = enrollments::find_enrollment_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Enrollment not found"))?;
        ensure_own(caller, &enrollment)?;

        enrollments::delete_enrollment(&mut *tx, id).await?;
        courses::adjust_students(&mut *tx, &enrollment.course_id, -1).await?;
        tx.commit().await?;

        info!("student {} left course {}", caller.id, enrollment.course_id);
        Ok(())
    }

    /// Marks a lesson done (or undone) and recomputes the progress percentage
    /// against the course's current lessons.
    pub async fn toggle_lesson(&self, caller: &AuthUser, id: &str, lesson_id: &str) -> Result<Enrollment, AppError> {
        let mut tx = self.db.begin().await?;
        let mut enrollment = enrollments::find_enrollment_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Enrollment not found"))?;
        ensure_own(caller, &enrollment)?;

        let lesson = lessons::find_lesson_by_id(&mut *tx, lesson_id)
            .await?
            .ok_or(AppError::NotFound("Lesson not found"))?;
        if lesson.course_id != enrollment.course_id {
            return Err(AppError::BadRequest("Lesson does not belong to this course".to_string()));
        }

        if enrollment.completed_lessons.iter().any(|l| l == lesson_id) {
            enrollment.completed_lessons.retain(|l| l != lesson_id);
        } else {
            enrollment.completed_lessons.push(lesson_id.to_string());
        }

        let course_lessons = lessons::lesson_ids(&mut *tx, &enrollment.course_id).await?;
        enrollment.completed_lessons.retain(|l| course_lessons.contains(l));
        enrollment.progress = progress_percent(enrollment.completed_lessons.len(), course_lessons.len());

        enrollments::update_progress(&mut *tx, &enrollment.id, &enrollment.completed_lessons, enrollment.progress)
            .await?;
        tx.commit().await?;

        Ok(enrollment)
    }
}

pub(crate) fn ensure_own(caller: &AuthUser, enrollment: &Enrollment) -> Result<(), AppError> {
    if caller.id == enrollment.student_id {
        Ok(())
    } else {
        Err(AppError::Forbidden("You can only manage your own enrollments".to_string()))
    }
}

/// Takes a seat in the course and records the enrollment. Must run inside the
/// caller's transaction so a full course or a duplicate rolls both back.
pub(crate) async fn create_enrollment(
    conn: &mut SqliteConnection,
    course_id: &str,
    student_id: &str,
    full_name: &str,
    phone_number: &str,
) -> Result<Enrollment, AppError> {
    if !courses::adjust_students(&mut *conn, course_id, 1).await? {
        return Err(AppError::Conflict("Course is full".to_string()));
    }

    let enrollment = Enrollment {
        id: db::new_id(),
        course_id: course_id.to_string(),
        student_id: student_id.to_string(),
        full_name: full_name.to_string(),
        phone_number: phone_number.to_string(),
        enrollment_date: Utc::now().date_naive(),
        status: EnrollmentStatus::Active,
        progress: 0,
        completed_lessons: Vec::new(),
    };

    enrollments::insert_enrollment(&mut *conn, &enrollment)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "Already enrolled in this course"))?;

    Ok(enrollment)
}
