use sqlx::{QueryBuilder, Sqlite, SqliteExecutor};

use crate::models::{User, UserQuery};

pub async fn insert_user<'e, E: SqliteExecutor<'e>>(db: E, user: &User) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO users (id, name, email, password_hash, role, phone_number, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role)
    .bind(&user.phone_number)
    .bind(&user.created_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn find_user_by_id<'e, E: SqliteExecutor<'e>>(db: E, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_user_by_email<'e, E: SqliteExecutor<'e>>(db: E, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(db)
        .await
}

pub async fn list_users<'e, E: SqliteExecutor<'e>>(db: E, query: &UserQuery) -> Result<Vec<User>, sqlx::Error> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM users WHERE 1 = 1");
    if let Some(role) = query.role {
        qb.push(" AND role = ").push_bind(role);
    }
    if let Some(email) = &query.email {
        qb.push(" AND email = ").push_bind(crate::models::user::normalize_email(email));
    }
    qb.push(" ORDER BY created_at ASC");

    qb.build_query_as::<User>().fetch_all(db).await
}

pub async fn update_user<'e, E: SqliteExecutor<'e>>(db: E, user: &User) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET name = ?1,
            email = ?2,
            role = ?3,
            phone_number = ?4
        WHERE id = ?5
        "#,
    )
    .bind(&user.name)
    .bind(&user.email)
    .bind(user.role)
    .bind(&user.phone_number)
    .bind(&user.id)
    .execute(db)
    .await?
    .rows_affected();

    Ok(result > 0)
}

pub async fn update_password<'e, E: SqliteExecutor<'e>>(db: E, id: &str, password_hash: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET password_hash = ?1 WHERE id = ?2")
        .bind(password_hash)
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn delete_user<'e, E: SqliteExecutor<'e>>(db: E, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}
