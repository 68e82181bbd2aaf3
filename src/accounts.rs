//!
//! # Account Operations
//!
//! Credential-to-session flows (register, login) and the account lifecycle
//! operations that carry real invariants: profile updates that re-hash only
//! on password change and re-check email uniqueness, and the cascading
//! deletion that removes every owned task before the account record goes.

use chrono::Utc;
use validator::Validate;

use crate::auth::{hash_password, sessions, verify_password, LoginRequest, TokenIssuer};
use crate::error::AppError;
use crate::models::{Account, RegisterInput, UpdateAccountInput};
use crate::store::Store;

/// Creates an account, hashes the password, and opens the first session.
/// Email uniqueness is enforced against the lowercased address.
pub async fn register(
    store: &dyn Store,
    issuer: &TokenIssuer,
    input: RegisterInput,
) -> Result<(Account, String), AppError> {
    input.validate()?;

    let email = input.email.trim().to_lowercase();
    if store.find_account_by_email(&email).await?.is_some() {
        return Err(AppError::ValidationError("email already registered".into()));
    }

    let password_hash = hash_password(&input.password)?;
    let mut account = Account::new(input, password_hash);

    let token = issuer.issue(account.id)?;
    sessions::register(store, &mut account, token.clone()).await?;

    Ok((account, token))
}

/// Verifies credentials and opens a new session.
///
/// Unknown email, wrong password and malformed input all take the same
/// exit: the caller learns only that the pair did not authenticate. A
/// verifier failure on a malformed stored digest also fails closed here.
pub async fn login(
    store: &dyn Store,
    issuer: &TokenIssuer,
    credentials: &LoginRequest,
) -> Result<(Account, String), AppError> {
    let email = credentials.email.trim().to_lowercase();
    let mut account = store
        .find_account_by_email(&email)
        .await?
        .ok_or_else(AppError::unauthorized)?;

    match verify_password(&credentials.password, &account.password_hash) {
        Ok(true) => {}
        _ => return Err(AppError::unauthorized()),
    }

    let token = issuer.issue(account.id)?;
    sessions::register(store, &mut account, token.clone()).await?;

    Ok((account, token))
}

/// Applies an allow-listed profile update. The password is re-hashed only
/// when it actually changes; an email change re-checks uniqueness.
pub async fn update_account(
    store: &dyn Store,
    mut account: Account,
    input: UpdateAccountInput,
) -> Result<Account, AppError> {
    input.validate()?;

    if let Some(name) = input.name {
        account.name = name.trim().to_string();
    }
    if let Some(email) = input.email {
        let email = email.trim().to_lowercase();
        if email != account.email {
            if store.find_account_by_email(&email).await?.is_some() {
                return Err(AppError::ValidationError("email already registered".into()));
            }
            account.email = email;
        }
    }
    if let Some(age) = input.age {
        account.age = age;
    }
    if let Some(password) = input.password {
        account.password_hash = hash_password(&password)?;
    }

    account.updated_at = Utc::now();
    store.save_account(&account).await?;

    Ok(account)
}

/// Cascade coordinator: removes every task the account owns, then the
/// account itself. Task cleanup failing aborts the whole operation and
/// leaves the account (and its sessions) intact; a partial cascade is never
/// reported as success.
///
/// A concurrent second deletion finds the account already gone and gets
/// `NotFound`, never a half-deleted state.
pub async fn delete_account(store: &dyn Store, account: &Account) -> Result<(), AppError> {
    store.delete_tasks_for_owner(account.id).await?;

    if !store.delete_account(account.id).await? {
        return Err(AppError::NotFound("account not found".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::authenticate;
    use crate::models::{Task, TaskInput};
    use crate::store::MemStore;
    use pretty_assertions::assert_eq;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("accounts-test-secret")
    }

    fn register_input(email: &str) -> RegisterInput {
        RegisterInput {
            name: "Alice".to_string(),
            email: email.to_string(),
            age: Some(30),
            password: "correct horse battery".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_authenticate() {
        let store = MemStore::new();
        let issuer = issuer();

        let (account, token) = register(&store, &issuer, register_input("alice@example.com"))
            .await
            .unwrap();

        let (resolved, _) = authenticate(&store, &issuer, &token).await.unwrap();
        assert_eq!(resolved.id, account.id);
        // The plaintext never survives registration.
        assert_ne!(resolved.password_hash, "correct horse battery");
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let store = MemStore::new();
        let issuer = issuer();

        register(&store, &issuer, register_input("alice@example.com"))
            .await
            .unwrap();

        // Same address in a different casing is still a duplicate.
        let result = register(&store, &issuer, register_input("ALICE@Example.com")).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let store = MemStore::new();
        let issuer = issuer();
        register(&store, &issuer, register_input("alice@example.com"))
            .await
            .unwrap();

        let wrong_password = login(
            &store,
            &issuer,
            &LoginRequest {
                email: "alice@example.com".to_string(),
                password: "not her password".to_string(),
            },
        )
        .await;
        let unknown_email = login(
            &store,
            &issuer,
            &LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "correct horse battery".to_string(),
            },
        )
        .await;
        // Input that could never match any account is still just a failed
        // pair, not a validation complaint.
        let malformed = login(
            &store,
            &issuer,
            &LoginRequest {
                email: "not-an-email".to_string(),
                password: "x".to_string(),
            },
        )
        .await;

        match (wrong_password, unknown_email, malformed) {
            (
                Err(AppError::Unauthorized(a)),
                Err(AppError::Unauthorized(b)),
                Err(AppError::Unauthorized(c)),
            ) => {
                assert_eq!(a, b);
                assert_eq!(b, c);
            }
            other => panic!("expected three Unauthorized errors, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_each_login_gets_its_own_token() {
        let store = MemStore::new();
        let issuer = issuer();
        let (_, first) = register(&store, &issuer, register_input("alice@example.com"))
            .await
            .unwrap();

        let credentials = LoginRequest {
            email: "alice@example.com".to_string(),
            password: "correct horse battery".to_string(),
        };
        let (account, second) = login(&store, &issuer, &credentials).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(account.tokens.len(), 2);
    }

    #[tokio::test]
    async fn test_update_rehashes_only_on_password_change() {
        let store = MemStore::new();
        let issuer = issuer();
        let (account, _) = register(&store, &issuer, register_input("alice@example.com"))
            .await
            .unwrap();
        let original_hash = account.password_hash.clone();

        // A name-only update leaves the digest untouched.
        let account = update_account(
            &store,
            account,
            UpdateAccountInput {
                name: Some("Alice B.".to_string()),
                email: None,
                age: None,
                password: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(account.password_hash, original_hash);
        assert_eq!(account.name, "Alice B.");

        // A password update replaces it.
        let account = update_account(
            &store,
            account,
            UpdateAccountInput {
                name: None,
                email: None,
                age: None,
                password: Some("new horse battery".to_string()),
            },
        )
        .await
        .unwrap();
        assert_ne!(account.password_hash, original_hash);

        // And the new password logs in.
        let credentials = LoginRequest {
            email: "alice@example.com".to_string(),
            password: "new horse battery".to_string(),
        };
        assert!(login(&store, &issuer, &credentials).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_rejects_taken_email() {
        let store = MemStore::new();
        let issuer = issuer();
        register(&store, &issuer, register_input("alice@example.com"))
            .await
            .unwrap();
        let (bob, _) = register(&store, &issuer, register_input("bob@example.com"))
            .await
            .unwrap();

        let result = update_account(
            &store,
            bob,
            UpdateAccountInput {
                name: None,
                email: Some("alice@example.com".to_string()),
                age: None,
                password: None,
            },
        )
        .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_delete_account_cascades_to_tasks() {
        let store = MemStore::new();
        let issuer = issuer();
        let (alice, token) = register(&store, &issuer, register_input("alice@example.com"))
            .await
            .unwrap();
        let (bob, _) = register(&store, &issuer, register_input("bob@example.com"))
            .await
            .unwrap();

        for i in 0..3 {
            let task = Task::new(
                TaskInput {
                    description: format!("task {}", i),
                    completed: false,
                },
                alice.id,
            );
            store.save_task(&task).await.unwrap();
        }
        let bobs_task = Task::new(
            TaskInput {
                description: "bob's errand".to_string(),
                completed: false,
            },
            bob.id,
        );
        store.save_task(&bobs_task).await.unwrap();

        delete_account(&store, &alice).await.unwrap();

        // Zero tasks remain for the deleted owner; other owners untouched.
        assert_eq!(store.task_count_for(alice.id).await, 0);
        assert_eq!(store.task_count_for(bob.id).await, 1);

        // The account is unresolvable and its tokens are dead.
        assert!(store
            .find_account_by_id(alice.id)
            .await
            .unwrap()
            .is_none());
        assert!(matches!(
            authenticate(&store, &issuer, &token).await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_second_delete_is_not_found_never_partial() {
        let store = MemStore::new();
        let issuer = issuer();
        let (alice, _) = register(&store, &issuer, register_input("alice@example.com"))
            .await
            .unwrap();

        delete_account(&store, &alice).await.unwrap();
        let second = delete_account(&store, &alice).await;
        assert!(matches!(second, Err(AppError::NotFound(_))));
    }
}
