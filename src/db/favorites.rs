use sqlx::SqliteExecutor;

use crate::models::Favorite;

pub async fn insert_favorite<'e, E: SqliteExecutor<'e>>(db: E, favorite: &Favorite) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO favorites (id, user_id, course_id, added_at) VALUES (?1, ?2, ?3, ?4)")
        .bind(&favorite.id)
        .bind(&favorite.user_id)
        .bind(&favorite.course_id)
        .bind(&favorite.added_at)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn delete_favorite<'e, E: SqliteExecutor<'e>>(db: E, user_id: &str, course_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM favorites WHERE user_id = ?1 AND course_id = ?2")
        .bind(user_id)
        .bind(course_id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

/// Course ids in the order they were favorited.
pub async fn favorite_course_ids<'e, E: SqliteExecutor<'e>>(db: E, user_id: &str) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT course_id FROM favorites WHERE user_id = ? ORDER BY added_at, rowid")
        .bind(user_id)
        .fetch_all(db)
        .await
}

pub async fn is_favorite<'e, E: SqliteExecutor<'e>>(db: E, user_id: &str, course_id: &str) -> Result<bool, sqlx::Error> {
    let found = sqlx::query_scalar::<_, i64>("SELECT 1 FROM favorites WHERE user_id = ?1 AND course_id = ?2")
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(db)
        .await?;

    Ok(found.is_some())
}
