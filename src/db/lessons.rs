use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqliteExecutor};

use crate::models::Lesson;

pub async fn insert_lesson<'e, E: SqliteExecutor<'e>>(db: E, lesson: &Lesson) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO lessons
            (id, course_id, title, description, video_url, broadcast_url, duration,
            scheduled_date, scheduled_time, homework_description, homework_requirements,
            lesson_type, lesson_order, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
        "#,
    )
    .bind(&lesson.id)
    .bind(&lesson.course_id)
    .bind(&lesson.title)
    .bind(&lesson.description)
    .bind(&lesson.video_url)
    .bind(&lesson.broadcast_url)
    .bind(&lesson.duration)
    .bind(&lesson.scheduled_date)
    .bind(&lesson.scheduled_time)
    .bind(&lesson.homework_description)
    .bind(Json(&lesson.homework_requirements))
    .bind(lesson.lesson_type)
    .bind(lesson.order)
    .bind(&lesson.created_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn find_lesson_by_id<'e, E: SqliteExecutor<'e>>(db: E, id: &str) -> Result<Option<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>("SELECT * FROM lessons WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn list_lessons<'e, E: SqliteExecutor<'e>>(db: E, course_id: Option<&str>) -> Result<Vec<Lesson>, sqlx::Error> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM lessons");
    if let Some(course_id) = course_id {
        qb.push(" WHERE course_id = ").push_bind(course_id.to_string());
    }
    qb.push(" ORDER BY course_id, lesson_order ASC");

    qb.build_query_as::<Lesson>().fetch_all(db).await
}

pub async fn lesson_ids<'e, E: SqliteExecutor<'e>>(db: E, course_id: &str) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT id FROM lessons WHERE course_id = ? ORDER BY lesson_order")
        .bind(course_id)
        .fetch_all(db)
        .await
}

/// One past the highest order used in the course.
pub async fn next_order<'e, E: SqliteExecutor<'e>>(db: E, course_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT CAST(COALESCE(MAX(lesson_order), 0) + 1 AS INTEGER) FROM lessons WHERE course_id = ?",
    )
    .bind(course_id)
    .fetch_one(db)
    .await
}

pub async fn update_lesson<'e, E: SqliteExecutor<'e>>(db: E, lesson: &Lesson) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE lessons
        SET title = ?1,
            description = ?2,
            video_url = ?3,
            broadcast_url = ?4,
            duration = ?5,
            scheduled_date = ?6,
            scheduled_time = ?7,
            homework_description = ?8,
            homework_requirements = ?9,
            lesson_type = ?10,
            lesson_order = ?11
        WHERE id = ?12
        "#,
    )
    .bind(&lesson.title)
    .bind(&lesson.description)
    .bind(&lesson.video_url)
    .bind(&lesson.broadcast_url)
    .bind(&lesson.duration)
    .bind(&lesson.scheduled_date)
    .bind(&lesson.scheduled_time)
    .bind(&lesson.homework_description)
    .bind(Json(&lesson.homework_requirements))
    .bind(lesson.lesson_type)
    .bind(lesson.order)
    .bind(&lesson.id)
    .execute(db)
    .await?
    .rows_affected();

    Ok(result > 0)
}

pub async fn delete_lesson<'e, E: SqliteExecutor<'e>>(db: E, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM lessons WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}
