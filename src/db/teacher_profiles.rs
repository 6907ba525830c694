use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqliteExecutor};

use crate::models::{TeacherProfile, TeacherProfileQuery};

pub async fn find_profile_by_id<'e, E: SqliteExecutor<'e>>(db: E, id: &str) -> Result<Option<TeacherProfile>, sqlx::Error> {
    sqlx::query_as::<_, TeacherProfile>("SELECT * FROM teacher_profiles WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_profile_by_teacher<'e, E: SqliteExecutor<'e>>(
    db: E,
    teacher_id: &str,
) -> Result<Option<TeacherProfile>, sqlx::Error> {
    sqlx::query_as::<_, TeacherProfile>("SELECT * FROM teacher_profiles WHERE teacher_id = ?")
        .bind(teacher_id)
        .fetch_optional(db)
        .await
}

pub async fn list_profiles<'e, E: SqliteExecutor<'e>>(
    db: E,
    query: &TeacherProfileQuery,
) -> Result<Vec<TeacherProfile>, sqlx::Error> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM teacher_profiles");
    if let Some(teacher_id) = &query.teacher_id {
        qb.push(" WHERE teacher_id = ").push_bind(teacher_id.clone());
    }
    qb.push(" ORDER BY teacher_name");

    qb.build_query_as::<TeacherProfile>().fetch_all(db).await
}

/// Inserts the profile, or overwrites the teacher's existing one keeping its
/// id and creation time.
pub async fn upsert_profile<'e, E: SqliteExecutor<'e>>(db: E, profile: &TeacherProfile) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO teacher_profiles
            (id, teacher_id, teacher_name, email, avatar, bio, expertise, experience,
            education, certifications, social_links, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        ON CONFLICT(teacher_id) DO UPDATE SET
            teacher_name = excluded.teacher_name,
            email = excluded.email,
            avatar = excluded.avatar,
            bio = excluded.bio,
            expertise = excluded.expertise,
            experience = excluded.experience,
            education = excluded.education,
            certifications = excluded.certifications,
            social_links = excluded.social_links,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(&profile.id)
    .bind(&profile.teacher_id)
    .bind(&profile.teacher_name)
    .bind(&profile.email)
    .bind(&profile.avatar)
    .bind(&profile.bio)
    .bind(Json(&profile.expertise))
    .bind(&profile.experience)
    .bind(&profile.education)
    .bind(Json(&profile.certifications))
    .bind(Json(&profile.social_links))
    .bind(&profile.created_at)
    .bind(&profile.updated_at)
    .execute(db)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::db::testing::{seed_user, setup_test_db};
    use crate::models::Role;

    #[tokio::test]
    async fn test_upsert_keeps_identity() {
        let pool = setup_test_db().await;
        let teacher = seed_user(&pool, "Tina", Role::Teacher).await;

        let mut profile = TeacherProfile {
            id: crate::db::new_id(),
            teacher_id: teacher.id.clone(),
            teacher_name: "Tina".to_string(),
            email: teacher.email.clone(),
            avatar: String::new(),
            bio: "Systems programmer".to_string(),
            expertise: vec!["Rust".to_string()],
            experience: "10 years".to_string(),
            education: String::new(),
            certifications: Vec::new(),
            social_links: BTreeMap::from([("github".to_string(), "https://github.com/tina".to_string())]),
            created_at: crate::db::now(),
            updated_at: crate::db::now(),
        };
        upsert_profile(&pool, &profile).await.unwrap();
        let original_id = profile.id.clone();

        profile.id = crate::db::new_id();
        profile.bio = "Compiler engineer".to_string();
        upsert_profile(&pool, &profile).await.unwrap();

        let stored = find_profile_by_teacher(&pool, &teacher.id).await.unwrap().unwrap();
        assert_eq!(stored.id, original_id);
        assert_eq!(stored.bio, "Compiler engineer");
        assert_eq!(stored.social_links.get("github").map(String::as_str), Some("https://github.com/tina"));

        let listed = list_profiles(&pool, &TeacherProfileQuery::default()).await.unwrap();
        assert_eq!(listed.len(), 1);
    }
}
