//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the
//! application. It centralizes error management and implements
//! `actix_web::error::ResponseError` so handler errors turn into JSON
//! responses with the right status code.
//!
//! Two taxonomy rules are deliberate and must not be weakened:
//! - Every authentication failure (bad signature, revoked token, unknown
//!   account, wrong credential pair) produces the same `Unauthorized` message.
//! - A resource that exists but belongs to someone else is reported exactly
//!   like a resource that does not exist.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// The single message used for every authentication failure.
///
/// Expired signatures, revoked-but-well-signed tokens, deleted accounts and
/// wrong passwords must be indistinguishable to a client.
pub const UNAUTHORIZED_MSG: &str = "unable to authenticate";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Authentication failed (HTTP 401). Always carries [`UNAUTHORIZED_MSG`];
    /// construct it through [`AppError::unauthorized`].
    Unauthorized(String),
    /// A requested resource is absent or not owned by the caller (HTTP 404).
    NotFound(String),
    /// Input failed validation (HTTP 422 Unprocessable Entity), including
    /// unique-email conflicts and password-policy violations.
    ValidationError(String),
    /// An unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// An error originating from the store (HTTP 500). Wraps `sqlx` errors.
    DatabaseError(String),
}

impl AppError {
    /// The uniform authentication failure.
    pub fn unauthorized() -> Self {
        AppError::Unauthorized(UNAUTHORIZED_MSG.into())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// Internal errors are logged with their detail and surfaced to the client
/// with a generic body only.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(json!({
                "error": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            AppError::ValidationError(msg) => HttpResponse::UnprocessableEntity().json(json!({
                "error": msg
            })),
            AppError::InternalServerError(msg) => {
                log::error!("internal error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "error": "internal server error"
                }))
            }
            AppError::DatabaseError(msg) => {
                log::error!("database error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "error": "internal server error"
                }))
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// JWT processing failures collapse into the uniform authentication error;
/// the cause (malformed, bad signature, wrong algorithm) is never exposed.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_: jsonwebtoken::errors::Error) -> AppError {
        AppError::unauthorized()
    }
}

/// Errors during password hashing are internal. The login path separately
/// folds verification failures into the uniform `Unauthorized` error.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_responses() {
        let error = AppError::unauthorized();
        let response = error.error_response();
        assert_eq!(response.status(), 401);

        let error = AppError::NotFound("task not found".into());
        let response = error.error_response();
        assert_eq!(response.status(), 404);

        let error = AppError::ValidationError("email already registered".into());
        let response = error.error_response();
        assert_eq!(response.status(), 422);

        let error = AppError::InternalServerError("boom".into());
        let response = error.error_response();
        assert_eq!(response.status(), 500);
    }

    #[test]
    fn test_auth_failures_share_one_message() {
        // A decode failure and an explicit unauthorized must be identical.
        let jwt_err =
            jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::InvalidSignature);
        let from_jwt = AppError::from(jwt_err);
        match (from_jwt, AppError::unauthorized()) {
            (AppError::Unauthorized(a), AppError::Unauthorized(b)) => assert_eq!(a, b),
            _ => panic!("expected Unauthorized variants"),
        }
    }
}
