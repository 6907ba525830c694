use sqlx::SqlitePool;
use tracing::info;

use crate::auth::AuthUser;
use crate::db::{self, courses, teacher_profiles, users};
use crate::error::AppError;
use crate::models::lesson::clean_list;
use crate::models::review::round_one_decimal;
use crate::models::{
    Role, TeacherProfile, TeacherProfileQuery, TeacherProfileView, TeacherStats, UpsertTeacherProfileRequest,
};

pub struct TeacherProfileService {
    db: SqlitePool,
}

impl TeacherProfileService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn get(&self, id: &str) -> Result<TeacherProfileView, AppError> {
        let profile = teacher_profiles::find_profile_by_id(&self.db, id)
            .await?
            .ok_or(AppError::NotFound("Teacher profile not found"))?;
        self.with_stats(profile).await
    }

    pub async fn list(&self, query: &TeacherProfileQuery) -> Result<Vec<TeacherProfileView>, AppError> {
        let profiles = teacher_profiles::list_profiles(&self.db, query).await?;
        let mut views = Vec::with_capacity(profiles.len());
        for profile in profiles {
            views.push(self.with_stats(profile).await?);
        }
        Ok(views)
    }

    /// Creates the caller's profile or replaces its editable fields.
    pub async fn upsert(&self, caller: &AuthUser, req: UpsertTeacherProfileRequest) -> Result<TeacherProfileView, AppError> {
        caller.require_role(Role::Teacher)?;
        let teacher = users::find_user_by_id(&self.db, &caller.id)
            .await?
            .ok_or(AppError::NotFound("User not found"))?;
        let existing = teacher_profiles::find_profile_by_teacher(&self.db, &caller.id).await?;

        let now = db::now();
        let (id, created_at) = match existing {
            Some(profile) => (profile.id, profile.created_at),
            None => (db::new_id(), now.clone()),
        };

        let profile = TeacherProfile {
            id,
            teacher_id: teacher.id,
            teacher_name: non_blank(req.teacher_name).unwrap_or(teacher.name),
            email: non_blank(req.email).unwrap_or(teacher.email),
            avatar: req.avatar,
            bio: req.bio,
            expertise: clean_list(req.expertise),
            experience: req.experience,
            education: req.education,
            certifications: clean_list(req.certifications),
            social_links: req
                .social_links
                .into_iter()
                .filter(|(_, url)| !url.trim().is_empty())
                .collect(),
            created_at,
            updated_at: now,
        };
        teacher_profiles::upsert_profile(&self.db, &profile).await?;
        info!("teacher profile saved for {}", profile.teacher_id);

        // the stored row keeps the original id on conflict
        let saved = teacher_profiles::find_profile_by_teacher(&self.db, &caller.id)
            .await?
            .ok_or(AppError::Internal("Teacher profile missing after save".to_string()))?;
        self.with_stats(saved).await
    }

    async fn with_stats(&self, profile: TeacherProfile) -> Result<TeacherProfileView, AppError> {
        let stats = courses::teacher_stats(&self.db, &profile.teacher_id).await?;
        Ok(TeacherProfileView {
            profile,
            stats: TeacherStats {
                average_rating: round_one_decimal(stats.average_rating),
                ..stats
            },
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{caller, seed_course, seed_user, setup_test_db};
    use crate::models::RatingSummary;

    #[tokio::test]
    async fn test_upsert_keeps_identity() {
        let pool = setup_test_db().await;
        let tina = seed_user(&pool, "Tina", Role::Teacher).await;
        let svc = TeacherProfileService::new(pool);

        let created = svc
            .upsert(
                &caller(&tina),
                UpsertTeacherProfileRequest {
                    bio: "Systems programmer".to_string(),
                    expertise: vec!["Rust".to_string(), " ".to_string()],
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(created.profile.teacher_name, "Tina");
        assert_eq!(created.profile.email, "tina@example.com");
        assert_eq!(created.profile.expertise, vec!["Rust".to_string()]);

        let updated = svc
            .upsert(
                &caller(&tina),
                UpsertTeacherProfileRequest {
                    bio: "Still a systems programmer".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.profile.id, created.profile.id);
        assert_eq!(updated.profile.created_at, created.profile.created_at);
        assert_eq!(updated.profile.bio, "Still a systems programmer");
    }

    #[tokio::test]
    async fn test_students_cannot_have_profiles() {
        let pool = setup_test_db().await;
        let ann = seed_user(&pool, "Ann", Role::Student).await;
        let svc = TeacherProfileService::new(pool);

        assert!(matches!(
            svc.upsert(&caller(&ann), UpsertTeacherProfileRequest::default()).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_view_includes_course_stats() {
        let pool = setup_test_db().await;
        let tina = seed_user(&pool, "Tina", Role::Teacher).await;
        let rated = seed_course(&pool, &tina, None).await;
        let other = seed_course(&pool, &tina, None).await;
        seed_course(&pool, &tina, None).await;
        courses::adjust_students(&pool, &rated.id, 3).await.unwrap();
        courses::set_rating(&pool, &rated.id, RatingSummary { rating: 4.5, reviews: 2 }).await.unwrap();
        courses::set_rating(&pool, &other.id, RatingSummary { rating: 4.0, reviews: 1 }).await.unwrap();
        let svc = TeacherProfileService::new(pool);

        let saved = svc
            .upsert(&caller(&tina), UpsertTeacherProfileRequest::default())
            .await
            .unwrap();
        let view = svc.get(&saved.profile.id).await.unwrap();
        assert_eq!(view.stats.courses_taught, 3);
        assert_eq!(view.stats.total_students, 3);
        assert_eq!(view.stats.average_rating, 4.3);
        assert_eq!(view.stats.total_reviews, 3);

        assert_eq!(svc.list(&TeacherProfileQuery::default()).await.unwrap().len(), 1);
        assert!(matches!(svc.get("missing").await, Err(AppError::NotFound(_))));
    }
}
