use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub added_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    pub course_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FavoriteList {
    pub favorites: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FavoriteChange {
    pub message: &'static str,
    pub favorites: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteCheck {
    pub is_favorite: bool,
}
