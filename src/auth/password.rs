use tracing::warn;

use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Hashes on the blocking pool; bcrypt is deliberately slow.
pub async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("hash task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("bcrypt hash failed: {}", e)))
}

pub async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    let result = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("verify task failed: {}", e)))?;

    match result {
        Ok(valid) => Ok(valid),
        Err(e) => {
            warn!("stored password hash is unreadable: {}", e);
            Ok(false)
        }
    }
}

pub fn validate_new_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}
