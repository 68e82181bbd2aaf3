//!
//! # Outbound Notifications
//!
//! Account lifecycle events (welcome, account deleted) are announced through
//! the [`Notifier`] collaborator. Dispatch is fire-and-forget: the sending
//! future is spawned, and a failed notification is logged but never blocks
//! or rolls back the account operation it accompanies.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::AppError;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_welcome(&self, email: &str, name: &str) -> Result<(), AppError>;

    async fn notify_account_deleted(&self, email: &str, name: &str) -> Result<(), AppError>;
}

/// Default notifier: writes the notification to the log. Stands in for a
/// real mail delivery service behind the same trait.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify_welcome(&self, email: &str, name: &str) -> Result<(), AppError> {
        log::info!("welcome notification for {} <{}>", name, email);
        Ok(())
    }

    async fn notify_account_deleted(&self, email: &str, name: &str) -> Result<(), AppError> {
        log::info!("account-deleted notification for {} <{}>", name, email);
        Ok(())
    }
}

/// Spawns the welcome notification without waiting for it.
pub fn send_welcome(notifier: Arc<dyn Notifier>, email: String, name: String) {
    tokio::spawn(async move {
        if let Err(e) = notifier.notify_welcome(&email, &name).await {
            log::warn!("welcome notification to {} failed: {}", email, e);
        }
    });
}

/// Spawns the account-deleted notification without waiting for it.
pub fn send_account_deleted(notifier: Arc<dyn Notifier>, email: String, name: String) {
    tokio::spawn(async move {
        if let Err(e) = notifier.notify_account_deleted(&email, &name).await {
            log::warn!("account-deleted notification to {} failed: {}", email, e);
        }
    });
}
