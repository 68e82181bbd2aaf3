use crate::error::AppError;
use bcrypt::{hash, verify, DEFAULT_COST};

/// One-way, salted, slow hash of a plaintext password. Called only when the
/// stored password value changes, never on every save.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::InternalServerError(format!("failed to hash password: {}", e)))
}

/// Constant-time comparison of a plaintext against a stored digest.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    verify(password, hashed_password)
        .map_err(|e| AppError::InternalServerError(format!("failed to verify password: {}", e)))
}
