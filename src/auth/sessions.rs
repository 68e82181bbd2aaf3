//!
//! # Session Registry
//!
//! Each account carries an ordered list of its currently valid tokens. The
//! functions here are the only place that list is mutated, and every
//! mutation is written back through the store before the operation counts as
//! done. There is no in-memory cache: validity checks re-read the persisted
//! account.
//!
//! Concurrent mutations to the same account's list resolve last-write-wins
//! over the whole list; see the store documentation.

use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::Account;
use crate::store::Store;

/// Appends a freshly issued token to the account's live set and persists the
/// account. No upper bound: every device gets its own session.
pub async fn register(
    store: &dyn Store,
    account: &mut Account,
    token: String,
) -> Result<(), AppError> {
    account.tokens.push(token);
    account.updated_at = Utc::now();
    store.save_account(account).await
}

/// Removes exactly one matching token if present. Revoking a token that is
/// already gone is a no-op, not an error.
pub async fn revoke(store: &dyn Store, account: &mut Account, token: &str) -> Result<(), AppError> {
    if let Some(pos) = account.tokens.iter().position(|t| t == token) {
        account.tokens.remove(pos);
        account.updated_at = Utc::now();
        store.save_account(account).await?;
    }
    Ok(())
}

/// Clears the account's entire token list, ending every session at once.
pub async fn revoke_all(store: &dyn Store, account: &mut Account) -> Result<(), AppError> {
    account.tokens.clear();
    account.updated_at = Utc::now();
    store.save_account(account).await
}

/// Membership test against the *persisted* account state. Never trusts a
/// previously observed snapshot.
pub async fn is_valid(
    store: &dyn Store,
    account_id: Uuid,
    token: &str,
) -> Result<bool, AppError> {
    let account = store.find_account_by_id(account_id).await?;
    Ok(account.map_or(false, |a| a.tokens.iter().any(|t| t == token)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RegisterInput;
    use crate::store::MemStore;

    fn account() -> Account {
        Account::new(
            RegisterInput {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                age: None,
                password: "irrelevant".to_string(),
            },
            "$2b$12$hash".to_string(),
        )
    }

    #[tokio::test]
    async fn test_register_appends_in_issuance_order() {
        let store = MemStore::new();
        let mut account = account();

        register(&store, &mut account, "t1".into()).await.unwrap();
        register(&store, &mut account, "t2".into()).await.unwrap();

        let saved = store
            .find_account_by_id(account.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved.tokens, vec!["t1", "t2"]);
        assert!(is_valid(&store, account.id, "t1").await.unwrap());
        assert!(is_valid(&store, account.id, "t2").await.unwrap());
    }

    #[tokio::test]
    async fn test_revoke_removes_only_the_given_token() {
        let store = MemStore::new();
        let mut account = account();
        register(&store, &mut account, "t1".into()).await.unwrap();
        register(&store, &mut account, "t2".into()).await.unwrap();

        revoke(&store, &mut account, "t1").await.unwrap();

        assert!(!is_valid(&store, account.id, "t1").await.unwrap());
        assert!(is_valid(&store, account.id, "t2").await.unwrap());
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let store = MemStore::new();
        let mut account = account();
        register(&store, &mut account, "t1".into()).await.unwrap();

        revoke(&store, &mut account, "t1").await.unwrap();
        // Second revocation of the same token is a quiet no-op.
        revoke(&store, &mut account, "t1").await.unwrap();
        revoke(&store, &mut account, "never-issued").await.unwrap();

        assert!(!is_valid(&store, account.id, "t1").await.unwrap());
    }

    #[tokio::test]
    async fn test_revoke_all_clears_every_session() {
        let store = MemStore::new();
        let mut account = account();
        for i in 0..3 {
            register(&store, &mut account, format!("t{}", i))
                .await
                .unwrap();
        }

        revoke_all(&store, &mut account).await.unwrap();

        for i in 0..3 {
            assert!(!is_valid(&store, account.id, &format!("t{}", i))
                .await
                .unwrap());
        }
        let saved = store
            .find_account_by_id(account.id)
            .await
            .unwrap()
            .unwrap();
        assert!(saved.tokens.is_empty());
    }

    #[tokio::test]
    async fn test_is_valid_for_unknown_account() {
        let store = MemStore::new();
        assert!(!is_valid(&store, Uuid::new_v4(), "t1").await.unwrap());
    }
}
