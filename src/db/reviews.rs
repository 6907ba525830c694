use sqlx::{QueryBuilder, Sqlite, SqliteExecutor};

use crate::models::{Review, ReviewQuery};

pub async fn insert_review<'e, E: SqliteExecutor<'e>>(db: E, review: &Review) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO course_reviews
            (id, course_id, student_id, student_name, rating, review, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&review.id)
    .bind(&review.course_id)
    .bind(&review.student_id)
    .bind(&review.student_name)
    .bind(review.rating)
    .bind(&review.review)
    .bind(&review.created_at)
    .bind(&review.updated_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn find_review_by_id<'e, E: SqliteExecutor<'e>>(db: E, id: &str) -> Result<Option<Review>, sqlx::Error> {
    sqlx::query_as::<_, Review>("SELECT * FROM course_reviews WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_review<'e, E: SqliteExecutor<'e>>(
    db: E,
    course_id: &str,
    student_id: &str,
) -> Result<Option<Review>, sqlx::Error> {
    sqlx::query_as::<_, Review>("SELECT * FROM course_reviews WHERE course_id = ?1 AND student_id = ?2")
        .bind(course_id)
        .bind(student_id)
        .fetch_optional(db)
        .await
}

pub async fn list_reviews<'e, E: SqliteExecutor<'e>>(db: E, query: &ReviewQuery) -> Result<Vec<Review>, sqlx::Error> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM course_reviews WHERE 1 = 1");
    if let Some(course_id) = &query.course_id {
        qb.push(" AND course_id = ").push_bind(course_id.clone());
    }
    if let Some(student_id) = &query.student_id {
        qb.push(" AND student_id = ").push_bind(student_id.clone());
    }
    qb.push(" ORDER BY created_at DESC");

    qb.build_query_as::<Review>().fetch_all(db).await
}

pub async fn update_review<'e, E: SqliteExecutor<'e>>(db: E, review: &Review) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE course_reviews
        SET rating = ?1,
            review = ?2,
            student_name = ?3,
            updated_at = ?4
        WHERE id = ?5
        "#,
    )
    .bind(review.rating)
    .bind(&review.review)
    .bind(&review.student_name)
    .bind(&review.updated_at)
    .bind(&review.id)
    .execute(db)
    .await?
    .rows_affected();

    Ok(result > 0)
}

pub async fn delete_review<'e, E: SqliteExecutor<'e>>(db: E, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM course_reviews WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn ratings_for_course<'e, E: SqliteExecutor<'e>>(db: E, course_id: &str) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT rating FROM course_reviews WHERE course_id = ?")
        .bind(course_id)
        .fetch_all(db)
        .await
}
