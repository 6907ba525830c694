use sqlx::{QueryBuilder, Sqlite, SqliteExecutor};

use crate::models::{Application, ApplicationQuery, ApplicationStatus};

pub async fn insert_application<'e, E: SqliteExecutor<'e>>(db: E, application: &Application) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO course_applications
            (id, course_id, student_id, student_name, student_email, phone_number,
            message, status, applied_at, reviewed_at, teacher_response)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
    )
    .bind(&application.id)
    .bind(&application.course_id)
    .bind(&application.student_id)
    .bind(&application.student_name)
    .bind(&application.student_email)
    .bind(&application.phone_number)
    .bind(&application.message)
    .bind(application.status)
    .bind(&application.applied_at)
    .bind(&application.reviewed_at)
    .bind(&application.teacher_response)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn find_application_by_id<'e, E: SqliteExecutor<'e>>(db: E, id: &str) -> Result<Option<Application>, sqlx::Error> {
    sqlx::query_as::<_, Application>("SELECT * FROM course_applications WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn list_applications<'e, E: SqliteExecutor<'e>>(
    db: E,
    query: &ApplicationQuery,
) -> Result<Vec<Application>, sqlx::Error> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM course_applications WHERE 1 = 1");
    if let Some(course_id) = &query.course_id {
        qb.push(" AND course_id = ").push_bind(course_id.clone());
    }
    if let Some(student_id) = &query.student_id {
        qb.push(" AND student_id = ").push_bind(student_id.clone());
    }
    if let Some(status) = query.status {
        qb.push(" AND status = ").push_bind(status);
    }
    qb.push(" ORDER BY applied_at DESC");

    qb.build_query_as::<Application>().fetch_all(db).await
}

/// Records the teacher's decision; only a pending application can move.
pub async fn record_decision<'e, E: SqliteExecutor<'e>>(
    db: E,
    id: &str,
    status: ApplicationStatus,
    teacher_response: Option<&str>,
    reviewed_at: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE course_applications
        SET status = ?1,
            teacher_response = ?2,
            reviewed_at = ?3
        WHERE id = ?4 AND status = 'pending'
        "#,
    )
    .bind(status)
    .bind(teacher_response)
    .bind(reviewed_at)
    .bind(id)
    .execute(db)
    .await?
    .rows_affected();

    Ok(result > 0)
}
