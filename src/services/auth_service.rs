use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::info;

use crate::auth::AuthUser;
use crate::auth::password::{hash_password, validate_new_password, verify_password};
use crate::auth::token::TokenKeys;
use crate::config::Config;
use crate::db::{self, courses, enrollments, reviews, users};
use crate::error::AppError;
use crate::models::user::normalize_email;
use crate::models::{
    AuthResponse, ChangePasswordRequest, EnrollmentQuery, LoginRequest, RegisterRequest, ReviewQuery, Role,
    UpdateUserRequest, User, UserSummary,
};
use crate::services::review_service::recompute_rating;

pub struct AuthService {
    db: SqlitePool,
    config: Arc<Config>,
    tokens: Arc<TokenKeys>,
}

impl AuthService {
    pub fn new(db: SqlitePool, config: Arc<Config>, tokens: Arc<TokenKeys>) -> Self {
        Self { db, config, tokens }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse, AppError> {
        let (Some(email), Some(password), Some(name), Some(role)) = (
            non_blank(req.email),
            req.password.filter(|p| !p.is_empty()),
            non_blank(req.name),
            non_blank(req.role),
        ) else {
            return Err(AppError::BadRequest("All fields are required".to_string()));
        };

        let role = Role::parse(&role)
            .ok_or_else(|| AppError::BadRequest("Role must be student or teacher".to_string()))?;
        let email = normalize_email(&email);
        validate_email(&email)?;
        validate_new_password(&password)?;

        if users::find_user_by_email(&self.db, &email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let password_hash = hash_password(password, self.config.bcrypt_cost).await?;
        let user = User {
            id: db::new_id(),
            name,
            email,
            password_hash,
            role,
            phone_number: non_blank(req.phone_number),
            created_at: db::now(),
        };

        users::insert_user(&self.db, &user)
            .await
            .map_err(|e| AppError::conflict_on_unique(e, "User already exists"))?;
        info!("registered {} {}", user.role, user.id);

        Ok(AuthResponse {
            message: "User registered successfully",
            token: self.tokens.issue(&user)?,
            user: UserSummary::from(&user),
        })
    }

    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AppError> {
        let (Some(email), Some(password)) = (non_blank(req.email), req.password.filter(|p| !p.is_empty())) else {
            return Err(AppError::BadRequest("Email and password are required".to_string()));
        };

        let invalid = || AppError::Unauthorized("Invalid credentials".to_string());
        let user = users::find_user_by_email(&self.db, &normalize_email(&email))
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(password, user.password_hash.clone()).await? {
            return Err(invalid());
        }

        Ok(AuthResponse {
            message: "Login successful",
            token: self.tokens.issue(&user)?,
            user: UserSummary::from(&user),
        })
    }

    pub async fn profile(&self, caller: &AuthUser) -> Result<User, AppError> {
        users::find_user_by_id(&self.db, &caller.id)
            .await?
            .ok_or(AppError::NotFound("User not found"))
    }

    pub async fn update_user(&self, caller: &AuthUser, id: &str, req: UpdateUserRequest) -> Result<User, AppError> {
        caller.require_self(id)?;
        let mut user = users::find_user_by_id(&self.db, id)
            .await?
            .ok_or(AppError::NotFound("User not found"))?;

        if let Some(name) = req.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::BadRequest("Name cannot be empty".to_string()));
            }
            user.name = name.to_string();
        }
        if let Some(email) = req.email {
            let email = normalize_email(&email);
            validate_email(&email)?;
            user.email = email;
        }
        if let Some(phone) = req.phone_number {
            user.phone_number = Some(phone.trim().to_string()).filter(|p| !p.is_empty());
        }

        users::update_user(&self.db, &user)
            .await
            .map_err(|e| AppError::conflict_on_unique(e, "Email is already in use"))?;

        Ok(user)
    }

    pub async fn change_password(&self, caller: &AuthUser, id: &str, req: ChangePasswordRequest) -> Result<(), AppError> {
        caller.require_self(id)?;
        let user = users::find_user_by_id(&self.db, id)
            .await?
            .ok_or(AppError::NotFound("User not found"))?;

        if !verify_password(req.current_password, user.password_hash).await? {
            return Err(AppError::Unauthorized("Current password is incorrect".to_string()));
        }
        validate_new_password(&req.new_password)?;

        let password_hash = hash_password(req.new_password, self.config.bcrypt_cost).await?;
        users::update_password(&self.db, id, &password_hash).await?;
        Ok(())
    }

    /// Deletes the account. Enrollments and reviews go with it through the
    /// foreign keys, so seats are released before the delete and ratings
    /// are recomputed after it.
    pub async fn delete_user(&self, caller: &AuthUser, id: &str) -> Result<(), AppError> {
        caller.require_self(id)?;
        let mut tx = self.db.begin().await?;

        let own_enrollments = EnrollmentQuery {
            course_id: None,
            student_id: Some(id.to_string()),
        };
        for enrollment in enrollments::list_enrollments(&mut *tx, &own_enrollments).await? {
            courses::adjust_students(&mut *tx, &enrollment.course_id, -1).await?;
        }

        let own_reviews = ReviewQuery {
            course_id: None,
            student_id: Some(id.to_string()),
        };
        let reviewed = reviews::list_reviews(&mut *tx, &own_reviews).await?;

        if !users::delete_user(&mut *tx, id).await? {
            return Err(AppError::NotFound("User not found"));
        }
        for review in reviewed {
            recompute_rating(&mut tx, &review.course_id).await?;
        }
        tx.commit().await?;

        info!("deleted user {}", id);
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.'));
    if valid {
        Ok(())
    } else {
        Err(AppError::BadRequest("Please enter a valid email address".to_string()))
    }
}
