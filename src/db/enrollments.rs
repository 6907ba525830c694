use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqliteExecutor};

use crate::models::{Enrollment, EnrollmentQuery};

pub async fn insert_enrollment<'e, E: SqliteExecutor<'e>>(db: E, enrollment: &Enrollment) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO enrollments
            (id, course_id, student_id, full_name, phone_number, enrollment_date,
            status, progress, completed_lessons)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(&enrollment.id)
    .bind(&enrollment.course_id)
    .bind(&enrollment.student_id)
    .bind(&enrollment.full_name)
    .bind(&enrollment.phone_number)
    .bind(enrollment.enrollment_date)
    .bind(enrollment.status)
    .bind(enrollment.progress)
    .bind(Json(&enrollment.completed_lessons))
    .execute(db)
    .await?;
    Ok(())
}

pub async fn find_enrollment_by_id<'e, E: SqliteExecutor<'e>>(db: E, id: &str) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>("SELECT * FROM enrollments WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_enrollment<'e, E: SqliteExecutor<'e>>(
    db: E,
    course_id: &str,
    student_id: &str,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>("SELECT * FROM enrollments WHERE course_id = ?1 AND student_id = ?2")
        .bind(course_id)
        .bind(student_id)
        .fetch_optional(db)
        .await
}

pub async fn list_enrollments<'e, E: SqliteExecutor<'e>>(
    db: E,
    query: &EnrollmentQuery,
) -> Result<Vec<Enrollment>, sqlx::Error> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM enrollments WHERE 1 = 1");
    if let Some(course_id) = &query.course_id {
        qb.push(" AND course_id = ").push_bind(course_id.clone());
    }
    if let Some(student_id) = &query.student_id {
        qb.push(" AND student_id = ").push_bind(student_id.clone());
    }
    qb.push(" ORDER BY enrollment_date DESC, rowid DESC");

    qb.build_query_as::<Enrollment>().fetch_all(db).await
}

pub async fn update_progress<'e, E: SqliteExecutor<'e>>(
    db: E,
    id: &str,
    completed_lessons: &[String],
    progress: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE enrollments
        SET completed_lessons = ?1,
            progress = ?2
        WHERE id = ?3
        "#,
    )
    .bind(Json(completed_lessons))
    .bind(progress)
    .bind(id)
    .execute(db)
    .await?
    .rows_affected();

    Ok(result > 0)
}

pub async fn delete_enrollment<'e, E: SqliteExecutor<'e>>(db: E, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM enrollments WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{seed_course, seed_user, setup_test_db};
    use crate::models::{EnrollmentStatus, Role};

    fn enrollment(course_id: &str, student_id: &str) -> Enrollment {
        Enrollment {
            id: crate::db::new_id(),
            course_id: course_id.to_string(),
            student_id: student_id.to_string(),
            full_name: "Ann Lee".to_string(),
            phone_number: "5550100".to_string(),
            enrollment_date: chrono::Utc::now().date_naive(),
            status: EnrollmentStatus::Active,
            progress: 0,
            completed_lessons: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_query_enrollment() {
        let pool = setup_test_db().await;
        let teacher = seed_user(&pool, "Tina", Role::Teacher).await;
        let student = seed_user(&pool, "Ann", Role::Student).await;
        let course = seed_course(&pool, &teacher, None).await;

        let record = enrollment(&course.id, &student.id);
        insert_enrollment(&pool, &record).await.unwrap();

        let found = find_enrollment(&pool, &course.id, &student.id).await.unwrap().expect("enrollment");
        assert_eq!(found.id, record.id);
        assert!(found.completed_lessons.is_empty());

        let by_student = list_enrollments(
            &pool,
            &EnrollmentQuery {
                course_id: None,
                student_id: Some(student.id.clone()),
            },
        )
        .await
        .unwrap();
        assert_eq!(by_student.len(), 1);
    }

    #[tokio::test]
    async fn test_second_enrollment_is_rejected() {
        let pool = setup_test_db().await;
        let teacher = seed_user(&pool, "Tina", Role::Teacher).await;
        let student = seed_user(&pool, "Ann", Role::Student).await;
        let course = seed_course(&pool, &teacher, None).await;

        insert_enrollment(&pool, &enrollment(&course.id, &student.id)).await.unwrap();
        let err = insert_enrollment(&pool, &enrollment(&course.id, &student.id))
            .await
            .unwrap_err();
        assert!(matches!(err, sqlx::Error::Database(ref db) if db.is_unique_violation()));
    }

    #[tokio::test]
    async fn test_update_progress_round_trips_lessons() {
        let pool = setup_test_db().await;
        let teacher = seed_user(&pool, "Tina", Role::Teacher).await;
        let student = seed_user(&pool, "Ann", Role::Student).await;
        let course = seed_course(&pool, &teacher, None).await;
        let record = enrollment(&course.id, &student.id);
        insert_enrollment(&pool, &record).await.unwrap();

        let completed = vec!["l1".to_string(), "l2".to_string()];
        assert!(update_progress(&pool, &record.id, &completed, 50).await.unwrap());

        let stored = find_enrollment_by_id(&pool, &record.id).await.unwrap().unwrap();
        assert_eq!(stored.completed_lessons, completed);
        assert_eq!(stored.progress, 50);
    }
}
