use sqlx::SqlitePool;
use tracing::info;

use crate::auth::AuthUser;
use crate::db::{self, applications, courses, enrollments, users};
use crate::error::AppError;
use crate::models::{Application, ApplicationStatus, NewApplicationRequest, ReviewApplicationRequest, Role};
use crate::services::course_service::owned_course;
use crate::services::enrollment_service::create_enrollment;

pub struct ApplicationService {
    db: SqlitePool,
}

impl ApplicationService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn apply(&self, caller: &AuthUser, req: NewApplicationRequest) -> Result<Application, AppError> {
        caller.require_role(Role::Student)?;

        let course = courses::find_course_by_id(&self.db, &req.course_id)
            .await?
            .ok_or(AppError::NotFound("Course not found"))?;
        if course.is_full() {
            return Err(AppError::Conflict("Course is full".to_string()));
        }
        if enrollments::find_enrollment(&self.db, &course.id, &caller.id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Already enrolled in this course".to_string()));
        }

        let student = users::find_user_by_id(&self.db, &caller.id)
            .await?
            .ok_or(AppError::NotFound("User not found"))?;

        let application = Application {
            id: db::new_id(),
            course_id: course.id,
            student_id: student.id,
            student_name: student.name,
            student_email: student.email,
            phone_number: student.phone_number.unwrap_or_default(),
            message: req.message.trim().to_string(),
            status: ApplicationStatus::Pending,
            applied_at: db::now(),
            reviewed_at: None,
            teacher_response: None,
        };

        applications::insert_application(&self.db, &application)
            .await
            .map_err(|e| AppError::conflict_on_unique(e, "You have already applied to this course"))?;

        info!("student {} applied to course {}", application.student_id, application.course_id);
        Ok(application)
    }

    /// Approves or rejects a pending application. Approval enrolls the student
    /// in the same transaction, so a course that filled up meanwhile leaves
    /// the application pending.
    pub async fn review(&self, caller: &AuthUser, id: &str, req: ReviewApplicationRequest) -> Result<Application, AppError> {
        if req.status == ApplicationStatus::Pending {
            return Err(AppError::BadRequest("Status must be approved or rejected".to_string()));
        }

        let mut tx = self.db.begin().await?;
        let mut application = applications::find_application_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Application not found"))?;
        owned_course(&mut *tx, &application.course_id, caller).await?;

        let teacher_response = req
            .teacher_response
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        let reviewed_at = db::now();

        if !applications::record_decision(&mut *tx, id, req.status, teacher_response.as_deref(), &reviewed_at).await? {
            return Err(AppError::Conflict("Application has already been reviewed".to_string()));
        }

        if req.status == ApplicationStatus::Approved {
            create_enrollment(
                &mut tx,
                &application.course_id,
                &application.student_id,
                &application.student_name,
                &application.phone_number,
            )
            .await?;
        }
        tx.commit().await?;

        application.status = req.status;
        application.teacher_response = teacher_response;
        application.reviewed_at = Some(reviewed_at);

        info!("application {} marked {:?}", application.id, application.status);
        Ok(application)
    }
}
