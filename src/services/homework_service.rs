use sqlx::SqlitePool;
use tracing::info;

use crate::auth::AuthUser;
use crate::db::{self, enrollments, homework, lessons, users};
use crate::error::AppError;
use crate::models::homework::is_valid_link;
use crate::models::{GradeHomeworkRequest, Homework, HomeworkStatus, SubmitHomeworkRequest};
use crate::services::course_service::owned_course;
use crate::services::enrollment_service::ensure_own;

pub struct HomeworkService {
    db: SqlitePool,
}

impl HomeworkService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Stores a submission for a lesson. A second submission for the same
    /// lesson replaces the link and puts the homework back to ungraded.
    pub async fn submit(&self, caller: &AuthUser, req: SubmitHomeworkRequest) -> Result<Homework, AppError> {
        let link = req.github_link.trim();
        if !is_valid_link(link) {
            return Err(AppError::BadRequest("Please enter a valid URL".to_string()));
        }

        let mut tx = self.db.begin().await?;
        let enrollment = enrollments::find_enrollment_by_id(&mut *tx, &req.enrollment_id)
            .await?
            .ok_or(AppError::NotFound("Enrollment not found"))?;
        ensure_own(caller, &enrollment)?;

        let lesson = lessons::find_lesson_by_id(&mut *tx, &req.lesson_id)
            .await?
            .ok_or(AppError::NotFound("Lesson not found"))?;
        if lesson.course_id != enrollment.course_id {
            return Err(AppError::BadRequest("Lesson does not belong to this course".to_string()));
        }

        let submitted_at = db::now();
        let saved = match homework::find_homework_for_lesson(&mut *tx, &enrollment.id, &lesson.id).await? {
            Some(mut existing) => {
                homework::resubmit_homework(&mut *tx, &existing.id, link, &submitted_at).await?;
                existing.github_link = link.to_string();
                existing.submitted_at = submitted_at;
                existing.grade = None;
                existing.feedback = None;
                existing.status = HomeworkStatus::Submitted;
                existing.graded_by = None;
                existing.graded_at = None;
                existing
            }
            None => {
                let created = Homework {
                    id: db::new_id(),
                    enrollment_id: enrollment.id.clone(),
                    lesson_id: lesson.id.clone(),
                    course_id: enrollment.course_id.clone(),
                    student_id: enrollment.student_id.clone(),
                    github_link: link.to_string(),
                    submitted_at,
                    grade: None,
                    feedback: None,
                    status: HomeworkStatus::Submitted,
                    graded_by: None,
                    graded_at: None,
                };
                homework::insert_homework(&mut *tx, &created).await?;
                created
            }
        };
        tx.commit().await?;

        info!("homework {} submitted for lesson {}", saved.id, saved.lesson_id);
        Ok(saved)
    }

    pub async fn grade(&self, caller: &AuthUser, id: &str, req: GradeHomeworkRequest) -> Result<Homework, AppError> {
        if !(0..=100).contains(&req.grade) {
            return Err(AppError::BadRequest("Grade must be between 0 and 100".to_string()));
        }

        let mut submission = homework::find_homework_by_id(&self.db, id)
            .await?
            .ok_or(AppError::NotFound("Homework not found"))?;
        owned_course(&self.db, &submission.course_id, caller).await?;
        let teacher = users::find_user_by_id(&self.db, &caller.id)
            .await?
            .ok_or(AppError::NotFound("User not found"))?;

        submission.grade = Some(req.grade);
        submission.feedback = req.feedback.map(|f| f.trim().to_string()).filter(|f| !f.is_empty());
        submission.status = HomeworkStatus::Graded;
        submission.graded_by = Some(teacher.name);
        submission.graded_at = Some(db::now());

        homework::grade_homework(&self.db, &submission).await?;
        Ok(submission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{caller, seed_course, seed_user, setup_test_db};
    use crate::models::{Enrollment, Lesson, NewEnrollmentRequest, NewLessonRequest, Role, User};
    use crate::services::enrollment_service::EnrollmentService;
    use crate::services::lesson_service::LessonService;

    struct Fixture {
        pool: SqlitePool,
        teacher: User,
        student: User,
        enrollment: Enrollment,
        lesson: Lesson,
    }

    async fn fixture() -> Fixture {
        let pool = setup_test_db().await;
        let teacher = seed_user(&pool, "Tina", Role::Teacher).await;
        let student = seed_user(&pool, "Ann", Role::Student).await;
        let course = seed_course(&pool, &teacher, None).await;
        let lesson = LessonService::new(pool.clone())
            .create(
                &caller(&teacher),
                NewLessonRequest {
                    course_id: course.id.clone(),
                    title: "Intro".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let enrollment = EnrollmentService::new(pool.clone())
            .enroll(
                &caller(&student),
                NewEnrollmentRequest {
                    course_id: course.id.clone(),
                    full_name: "Ann Lee".to_string(),
                    phone_number: "5551234567".to_string(),
                },
            )
            .await
            .unwrap();

        Fixture {
            pool,
            teacher,
            student,
            enrollment,
            lesson,
        }
    }

    fn submission(f: &Fixture, link: &str) -> SubmitHomeworkRequest {
        SubmitHomeworkRequest {
            enrollment_id: f.enrollment.id.clone(),
            lesson_id: f.lesson.id.clone(),
            github_link: link.to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_and_grade() {
        let f = fixture().await;
        let svc = HomeworkService::new(f.pool.clone());

        let submitted = svc
            .submit(&caller(&f.student), submission(&f, "https://github.com/ann/hw1"))
            .await
            .unwrap();
        assert_eq!(submitted.status, HomeworkStatus::Submitted);

        let graded = svc
            .grade(
                &caller(&f.teacher),
                &submitted.id,
                GradeHomeworkRequest {
                    grade: 92,
                    feedback: Some("Nice work".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(graded.status, HomeworkStatus::Graded);
        assert_eq!(graded.grade, Some(92));
        assert_eq!(graded.graded_by.as_deref(), Some("Tina"));
    }

    #[tokio::test]
    async fn test_resubmission_resets_grade() {
        let f = fixture().await;
        let svc = HomeworkService::new(f.pool.clone());
        let first = svc
            .submit(&caller(&f.student), submission(&f, "https://github.com/ann/hw1"))
            .await
            .unwrap();
        svc.grade(
            &caller(&f.teacher),
            &first.id,
            GradeHomeworkRequest { grade: 40, feedback: None },
        )
        .await
        .unwrap();

        let again = svc
            .submit(&caller(&f.student), submission(&f, "https://github.com/ann/hw1-fixed"))
            .await
            .unwrap();
        assert_eq!(again.id, first.id);
        assert_eq!(again.grade, None);
        assert_eq!(again.status, HomeworkStatus::Submitted);

        let stored = homework::find_homework_by_id(&f.pool, &first.id).await.unwrap().unwrap();
        assert_eq!(stored.github_link, "https://github.com/ann/hw1-fixed");
        assert_eq!(stored.graded_by, None);
    }

    #[tokio::test]
    async fn test_submit_and_grade_validation() {
        let f = fixture().await;
        let svc = HomeworkService::new(f.pool.clone());

        assert!(matches!(
            svc.submit(&caller(&f.student), submission(&f, "github.com/ann")).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            svc.submit(&caller(&f.teacher), submission(&f, "https://github.com/ann")).await,
            Err(AppError::Forbidden(_))
        ));

        let submitted = svc
            .submit(&caller(&f.student), submission(&f, "https://github.com/ann/hw1"))
            .await
            .unwrap();
        assert!(matches!(
            svc.grade(
                &caller(&f.teacher),
                &submitted.id,
                GradeHomeworkRequest { grade: 101, feedback: None }
            )
            .await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            svc.grade(
                &caller(&f.student),
                &submitted.id,
                GradeHomeworkRequest { grade: 90, feedback: None }
            )
            .await,
            Err(AppError::Forbidden(_))
        ));
    }
}
