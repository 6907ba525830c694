use chrono::{Duration, NaiveDate, Utc};
use sqlx::{SqliteExecutor, SqlitePool};
use tracing::info;

use crate::auth::AuthUser;
use crate::db::{self, courses, users};
use crate::error::AppError;
use crate::models::{Course, CourseStatus, NewCourseRequest, Role, UpdateCourseRequest};

const DEFAULT_COURSE_DAYS: i64 = 90;
const DEFAULT_LEVEL: &str = "Beginner";

pub struct CourseService {
    db: SqlitePool,
}

impl CourseService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create(&self, caller: &AuthUser, req: NewCourseRequest) -> Result<Course, AppError> {
        caller.require_role(Role::Teacher)?;
        let teacher = users::find_user_by_id(&self.db, &caller.id)
            .await?
            .ok_or(AppError::NotFound("User not found"))?;

        let title = req.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::BadRequest("Please enter a course title".to_string()));
        }
        validate_price(req.price)?;
        validate_capacity(req.max_students, 0)?;

        let today = Utc::now().date_naive();
        let start_date = req.start_date.unwrap_or(today);
        let end_date = req
            .end_date
            .unwrap_or(start_date + Duration::days(DEFAULT_COURSE_DAYS));
        validate_dates(start_date, end_date)?;

        let now = db::now();
        let course = Course {
            id: db::new_id(),
            title,
            description: req.description,
            teacher: teacher.name,
            teacher_id: teacher.id,
            category: req.category,
            price: req.price,
            duration: req.duration,
            max_students: req.max_students,
            students: 0,
            start_date,
            end_date,
            level: req
                .level
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LEVEL.to_string()),
            status: CourseStatus::for_dates(start_date, end_date, today),
            image: req.image,
            qr_code: req.qr_code,
            rating: 0.0,
            reviews: 0,
            created_at: now.clone(),
            updated_at: now,
        };

        courses::insert_course(&self.db, &course).await?;
        info!("teacher {} created course {}", course.teacher_id, course.id);
        Ok(course)
    }

    pub async fn update(&self, caller: &AuthUser, id: &str, req: UpdateCourseRequest) -> Result<Course, AppError> {
        let mut course = owned_course(&self.db, id, caller).await?;

        if let Some(title) = req.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(AppError::BadRequest("Please enter a course title".to_string()));
            }
            course.title = title;
        }
        if let Some(description) = req.description {
            course.description = description;
        }
        if let Some(category) = req.category {
            course.category = category;
        }
        if let Some(price) = req.price {
            validate_price(price)?;
            course.price = price;
        }
        if let Some(duration) = req.duration {
            course.duration = duration;
        }
        if let Some(max_students) = req.max_students {
            validate_capacity(max_students, course.students)?;
            course.max_students = max_students;
        }
        if let Some(level) = req.level {
            course.level = level;
        }
        if let Some(image) = req.image {
            course.image = image;
        }
        if let Some(qr_code) = req.qr_code {
            course.qr_code = qr_code;
        }
        if req.start_date.is_some() || req.end_date.is_some() {
            let start_date = req.start_date.unwrap_or(course.start_date);
            let end_date = req.end_date.unwrap_or(course.end_date);
            validate_dates(start_date, end_date)?;
            course.start_date = start_date;
            course.end_date = end_date;
            course.status = CourseStatus::for_dates(start_date, end_date, Utc::now().date_naive());
        }
        course.updated_at = db::now();

        courses::update_course(&self.db, &course).await?;
        Ok(course)
    }

    pub async fn delete(&self, caller: &AuthUser, id: &str) -> Result<(), AppError> {
        owned_course(&self.db, id, caller).await?;
        courses::delete_course(&self.db, id).await?;
        info!("teacher {} deleted course {}", caller.id, id);
        Ok(())
    }
}

/// Loads a course and checks that `caller` is the teacher who owns it.
pub async fn owned_course<'e, E: SqliteExecutor<'e>>(db: E, course_id: &str, caller: &AuthUser) -> Result<Course, AppError> {
    caller.require_role(Role::Teacher)?;
    let course = courses::find_course_by_id(db, course_id)
        .await?
        .ok_or(AppError::NotFound("Course not found"))?;

    if course.teacher_id != caller.id {
        return Err(AppError::Forbidden("You do not teach this course".to_string()));
    }
    Ok(course)
}

fn validate_price(price: f64) -> Result<(), AppError> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(AppError::BadRequest("Price must be zero or more".to_string()))
    }
}

fn validate_capacity(max_students: Option<i64>, current: i64) -> Result<(), AppError> {
    match max_students {
        Some(max) if max < 1 => Err(AppError::BadRequest("Capacity must be at least 1".to_string())),
        Some(max) if max < current => Err(AppError::BadRequest(format!(
            "Capacity cannot be lower than the {} students already enrolled",
            current
        ))),
        _ => Ok(()),
    }
}

fn validate_dates(start: NaiveDate, end: NaiveDate) -> Result<(), AppError> {
    if end < start {
        return Err(AppError::BadRequest("End date must not be before start date".to_string()));
    }
    Ok(())
}
