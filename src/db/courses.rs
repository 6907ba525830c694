use sqlx::{QueryBuilder, Sqlite, SqliteExecutor};

use crate::models::{Course, CourseQuery, CourseStatus, RatingSummary, TeacherStats};

pub async fn insert_course<'e, E: SqliteExecutor<'e>>(db: E, course: &Course) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO courses
            (id, title, description, teacher, teacher_id, category, price, duration,
            max_students, students, start_date, end_date, level, status, image, qr_code,
            rating, reviews, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)
        "#,
    )
    .bind(&course.id)
    .bind(&course.title)
    .bind(&course.description)
    .bind(&course.teacher)
    .bind(&course.teacher_id)
    .bind(&course.category)
    .bind(course.price)
    .bind(&course.duration)
    .bind(course.max_students)
    .bind(course.students)
    .bind(course.start_date)
    .bind(course.end_date)
    .bind(&course.level)
    .bind(course.status)
    .bind(&course.image)
    .bind(&course.qr_code)
    .bind(course.rating)
    .bind(course.reviews)
    .bind(&course.created_at)
    .bind(&course.updated_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn find_course_by_id<'e, E: SqliteExecutor<'e>>(db: E, id: &str) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Catalog search. `q` matches title or teacher name case-insensitively;
/// a category or status of `all` means no filter.
pub async fn list_courses<'e, E: SqliteExecutor<'e>>(db: E, query: &CourseQuery) -> Result<Vec<Course>, sqlx::Error> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM courses WHERE 1 = 1");

    if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = format!("%{}%", escape_like(&q.to_lowercase()));
        qb.push(" AND (LOWER(title) LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR LOWER(teacher) LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
    if let Some(category) = active_filter(query.category.as_deref()) {
        qb.push(" AND category = ").push_bind(category.to_string());
    }
    if let Some(status) = active_filter(query.status.as_deref()) {
        qb.push(" AND status = ").push_bind(status.to_string());
    }
    if let Some(teacher_id) = &query.teacher_id {
        qb.push(" AND teacher_id = ").push_bind(teacher_id.clone());
    }
    qb.push(" ORDER BY created_at DESC");

    qb.build_query_as::<Course>().fetch_all(db).await
}

pub async fn update_course<'e, E: SqliteExecutor<'e>>(db: E, course: &Course) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE courses
        SET title = ?1,
            description = ?2,
            category = ?3,
            price = ?4,
            duration = ?5,
            max_students = ?6,
            start_date = ?7,
            end_date = ?8,
            level = ?9,
            status = ?10,
            image = ?11,
            qr_code = ?12,
            updated_at = ?13
        WHERE id = ?14
        "#,
    )
    .bind(&course.title)
    .bind(&course.description)
    .bind(&course.category)
    .bind(course.price)
    .bind(&course.duration)
    .bind(course.max_students)
    .bind(course.start_date)
    .bind(course.end_date)
    .bind(&course.level)
    .bind(course.status)
    .bind(&course.image)
    .bind(&course.qr_code)
    .bind(&course.updated_at)
    .bind(&course.id)
    .execute(db)
    .await?
    .rows_affected();

    Ok(result > 0)
}

pub async fn delete_course<'e, E: SqliteExecutor<'e>>(db: E, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM courses WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

/// Moves the student count by `delta` only if the result stays within
/// `0..=max_students`. Returns false when the course is full (or absent).
pub async fn adjust_students<'e, E: SqliteExecutor<'e>>(db: E, id: &str, delta: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE courses
        SET students = students + ?2
        WHERE id = ?1
          AND students + ?2 >= 0
          AND (max_students IS NULL OR students + ?2 <= max_students)
        "#,
    )
    .bind(id)
    .bind(delta)
    .execute(db)
    .await?
    .rows_affected();

    Ok(result > 0)
}

pub async fn set_rating<'e, E: SqliteExecutor<'e>>(db: E, id: &str, summary: RatingSummary) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE courses SET rating = ?1, reviews = ?2 WHERE id = ?3")
        .bind(summary.rating)
        .bind(summary.reviews)
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn set_status<'e, E: SqliteExecutor<'e>>(db: E, id: &str, status: CourseStatus) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE courses SET status = ?1 WHERE id = ?2 AND status != ?1")
        .bind(status)
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn teacher_stats<'e, E: SqliteExecutor<'e>>(db: E, teacher_id: &str) -> Result<TeacherStats, sqlx::Error> {
    sqlx::query_as::<_, TeacherStats>(
        r#"
        SELECT
            CAST(COUNT(*) AS INTEGER) AS courses_taught,
            CAST(COALESCE(SUM(students), 0) AS INTEGER) AS total_students,
            CAST(COALESCE(AVG(CASE WHEN reviews > 0 THEN rating END), 0) AS REAL) AS average_rating,
            CAST(COALESCE(SUM(reviews), 0) AS INTEGER) AS total_reviews
        FROM courses
        WHERE teacher_id = ?
        "#,
    )
    .bind(teacher_id)
    .fetch_one(db)
    .await
}

fn active_filter(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
