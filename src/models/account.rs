use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A registered account, the owner of tasks and sessions.
///
/// `password_hash`, `tokens` and `avatar` never appear in serialized output;
/// the derive produces the public view directly.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    /// Stored lowercase; unique across all accounts.
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub age: i32,
    /// Opaque bytes, untouched by the core.
    #[serde(skip_serializing)]
    pub avatar: Option<Vec<u8>>,
    /// Live session tokens, insertion order = issuance order. This list is
    /// the source of truth for token validity.
    #[serde(skip_serializing)]
    pub tokens: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Builds a fresh account from registration input and an already-computed
    /// password hash. Name is trimmed, email is trimmed and lowercased.
    pub fn new(input: RegisterInput, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            email: input.email.trim().to_lowercase(),
            password_hash,
            age: input.age.unwrap_or(0),
            avatar: None,
            tokens: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Payload for account registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(custom = "crate::models::not_blank")]
    pub name: String,
    #[validate(email)]
    pub email: String,
    /// Defaults to 0 when omitted.
    #[validate(range(min = 0))]
    pub age: Option<i32>,
    #[validate(length(min = 7), custom = "crate::models::password_policy")]
    pub password: String,
}

/// Payload for profile updates. Only these four fields may be changed;
/// anything else in the body is rejected at deserialization.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateAccountInput {
    #[validate(custom = "crate::models::not_blank")]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(range(min = 0))]
    pub age: Option<i32>,
    #[validate(length(min = 7), custom = "crate::models::password_policy")]
    pub password: Option<String>,
}
