use crate::auth::token::TokenIssuer;
use crate::error::AppError;
use crate::models::Account;
use crate::store::Store;

/// Resolves a raw bearer token into the account it belongs to.
///
/// Three checks, in order: signature, account lookup, membership in the
/// account's live token set. All three failure branches return the identical
/// `Unauthorized` error, so an expired signature, a deleted account and a
/// revoked-but-well-signed token cannot be told apart from outside.
///
/// Returns the account together with the exact token string so that logout
/// can remove that specific entry.
pub async fn authenticate(
    store: &dyn Store,
    issuer: &TokenIssuer,
    raw_token: &str,
) -> Result<(Account, String), AppError> {
    let claims = issuer.decode(raw_token)?;

    let account = store
        .find_account_by_id(claims.sub)
        .await?
        .ok_or_else(AppError::unauthorized)?;

    if !account.tokens.iter().any(|t| t == raw_token) {
        return Err(AppError::unauthorized());
    }

    Ok((account, raw_token.to_string()))
}
