use sqlx::SqlitePool;

use crate::auth::AuthUser;
use crate::db::{self, courses, favorites};
use crate::error::AppError;
use crate::models::{AddFavoriteRequest, Favorite, FavoriteChange};

pub struct FavoriteService {
    db: SqlitePool,
}

impl FavoriteService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn list(&self, caller: &AuthUser) -> Result<Vec<String>, AppError> {
        Ok(favorites::favorite_course_ids(&self.db, &caller.id).await?)
    }

    pub async fn is_favorite(&self, caller: &AuthUser, course_id: &str) -> Result<bool, AppError> {
        Ok(favorites::is_favorite(&self.db, &caller.id, course_id).await?)
    }

    pub async fn add(&self, caller: &AuthUser, req: AddFavoriteRequest) -> Result<FavoriteChange, AppError> {
        let course_id = req
            .course_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::BadRequest("Course ID is required".to_string()))?;

        courses::find_course_by_id(&self.db, &course_id)
            .await?
            .ok_or(AppError::NotFound("Course not found"))?;

        let favorite = Favorite {
            id: db::new_id(),
            user_id: caller.id.clone(),
            course_id,
            added_at: db::now(),
        };
        favorites::insert_favorite(&self.db, &favorite)
            .await
            .map_err(|e| AppError::conflict_on_unique(e, "Course already in favorites"))?;

        Ok(FavoriteChange {
            message: "Course added to favorites",
            favorites: self.list(caller).await?,
        })
    }

    pub async fn remove(&self, caller: &AuthUser, course_id: &str) -> Result<FavoriteChange, AppError> {
        if !favorites::delete_favorite(&self.db, &caller.id, course_id).await? {
            return Err(AppError::NotFound("Course not in favorites"));
        }

        Ok(FavoriteChange {
            message: "Course removed from favorites",
            favorites: self.list(caller).await?,
        })
    }
}
