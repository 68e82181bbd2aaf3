use crate::error::AppError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the claims encoded within a session token.
///
/// There is deliberately no `exp` claim: a token stays cryptographically
/// valid forever, and its real validity is decided by membership in the
/// owning account's token list. Revocation, not expiry, ends a session.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// The owning account's id.
    pub sub: Uuid,
    /// Issuance timestamp (seconds since epoch).
    pub iat: i64,
    /// Fresh per issuance, so two tokens minted for the same account in the
    /// same second are still distinct strings.
    pub jti: Uuid,
}

/// Mints and verifies signed session tokens (HS256).
///
/// The signing secret comes from configuration; the issuer never touches the
/// store. `decode` is a pure function of the token and the secret.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
}

impl TokenIssuer {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Mints a new, distinct token bound to `account_id`.
    pub fn issue(&self, account_id: Uuid) -> Result<String, AppError> {
        let claims = Claims {
            sub: account_id,
            iat: chrono::Utc::now().timestamp(),
            jti: Uuid::new_v4(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::InternalServerError(format!("failed to issue token: {}", e)))
    }

    /// Verifies the signature and decodes the claims. Any failure collapses
    /// into the uniform authentication error.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Validity is membership-based, not time-based.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )?;
        Ok(data.claims)
    }
}
