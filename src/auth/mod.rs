pub mod extractors;
pub mod gate;
pub mod password;
pub mod sessions;
pub mod token;

use serde::{Deserialize, Serialize};

use crate::models::Account;

// Re-export necessary items
pub use extractors::AuthSession;
pub use gate::authenticate;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenIssuer};

/// Represents the payload for a login request.
///
/// Deliberately unvalidated: a malformed email or an impossible password is
/// just another pair that fails to authenticate, and it takes the same
/// uniform exit as a well-formed wrong pair.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Account email address; matched case-insensitively.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Response structure after successful registration or login: the account's
/// public view and the freshly issued session token.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub account: Account,
    pub token: String,
}
