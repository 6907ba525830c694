use sqlx::{QueryBuilder, Sqlite, SqliteExecutor};

use crate::models::{Homework, HomeworkQuery};

pub async fn insert_homework<'e, E: SqliteExecutor<'e>>(db: E, homework: &Homework) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO homework
            (id, enrollment_id, lesson_id, course_id, student_id, github_link,
            submitted_at, grade, feedback, status, graded_by, graded_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
    )
    .bind(&homework.id)
    .bind(&homework.enrollment_id)
    .bind(&homework.lesson_id)
    .bind(&homework.course_id)
    .bind(&homework.student_id)
    .bind(&homework.github_link)
    .bind(&homework.submitted_at)
    .bind(homework.grade)
    .bind(&homework.feedback)
    .bind(homework.status)
    .bind(&homework.graded_by)
    .bind(&homework.graded_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn find_homework_by_id<'e, E: SqliteExecutor<'e>>(db: E, id: &str) -> Result<Option<Homework>, sqlx::Error> {
    sqlx::query_as::<_, Homework>("SELECT * FROM homework WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_homework_for_lesson<'e, E: SqliteExecutor<'e>>(
    db: E,
    enrollment_id: &str,
    lesson_id: &str,
) -> Result<Option<Homework>, sqlx::Error> {
    sqlx::query_as::<_, Homework>("SELECT * FROM homework WHERE enrollment_id = ?1 AND lesson_id = ?2")
        .bind(enrollment_id)
        .bind(lesson_id)
        .fetch_optional(db)
        .await
}

pub async fn list_homework<'e, E: SqliteExecutor<'e>>(db: E, query: &HomeworkQuery) -> Result<Vec<Homework>, sqlx::Error> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM homework WHERE 1 = 1");
    if let Some(course_id) = &query.course_id {
        qb.push(" AND course_id = ").push_bind(course_id.clone());
    }
    if let Some(enrollment_id) = &query.enrollment_id {
        qb.push(" AND enrollment_id = ").push_bind(enrollment_id.clone());
    }
    if let Some(lesson_id) = &query.lesson_id {
        qb.push(" AND lesson_id = ").push_bind(lesson_id.clone());
    }
    qb.push(" ORDER BY submitted_at DESC");

    qb.build_query_as::<Homework>().fetch_all(db).await
}

/// Replaces the link of an existing submission and clears any grade.
pub async fn resubmit_homework<'e, E: SqliteExecutor<'e>>(
    db: E,
    id: &str,
    github_link: &str,
    submitted_at: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE homework
        SET github_link = ?1,
            submitted_at = ?2,
            grade = NULL,
            feedback = NULL,
            status = 'submitted',
            graded_by = NULL,
            graded_at = NULL
        WHERE id = ?3
        "#,
    )
    .bind(github_link)
    .bind(submitted_at)
    .bind(id)
    .execute(db)
    .await?
    .rows_affected();

    Ok(result > 0)
}

pub async fn grade_homework<'e, E: SqliteExecutor<'e>>(db: E, homework: &Homework) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE homework
        SET grade = ?1,
            feedback = ?2,
            status = ?3,
            graded_by = ?4,
            graded_at = ?5
        WHERE id = ?6
        "#,
    )
    .bind(homework.grade)
    .bind(&homework.feedback)
    .bind(homework.status)
    .bind(&homework.graded_by)
    .bind(&homework.graded_at)
    .bind(&homework.id)
    .execute(db)
    .await?
    .rows_affected();

    Ok(result > 0)
}
