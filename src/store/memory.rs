use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Account, Task};
use crate::store::{SortKey, Store, TaskFilter, TaskSort};

/// In-memory [`Store`] used by the test suites. Behaves like the Postgres
/// backend for everything the core relies on, including owner-scoped
/// predicates and whole-record upserts.
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    accounts: HashMap<Uuid, Account>,
    tasks: HashMap<Uuid, Task>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test helper: how many tasks exist for an owner, bypassing filters.
    pub async fn task_count_for(&self, owner: Uuid) -> usize {
        let inner = self.inner.lock().await;
        inner.tasks.values().filter(|t| t.owner == owner).count()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn find_account_by_id(&self, id: Uuid) -> Result<Option<Account>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner.accounts.get(&id).cloned())
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner.accounts.values().find(|a| a.email == email).cloned())
    }

    async fn save_account(&self, account: &Account) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;
        inner.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn delete_account(&self, id: Uuid) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().await;
        Ok(inner.accounts.remove(&id).is_some())
    }

    async fn find_tasks(&self, owner: Uuid, filter: &TaskFilter) -> Result<Vec<Task>, AppError> {
        let inner = self.inner.lock().await;
        let mut tasks: Vec<Task> = inner
            .tasks
            .values()
            .filter(|t| t.owner == owner)
            .filter(|t| filter.completed.map_or(true, |c| t.completed == c))
            .cloned()
            .collect();

        let sort = filter.sort.unwrap_or(TaskSort {
            key: SortKey::CreatedAt,
            descending: false,
        });
        tasks.sort_by(|a, b| {
            let ord = match sort.key {
                SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
                SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                SortKey::Completed => a.completed.cmp(&b.completed),
            };
            if sort.descending {
                ord.reverse()
            } else {
                ord
            }
        });

        let skip = filter.skip.unwrap_or(0).max(0) as usize;
        let tasks: Vec<Task> = match filter.limit {
            Some(limit) => tasks
                .into_iter()
                .skip(skip)
                .take(limit.max(0) as usize)
                .collect(),
            None => tasks.into_iter().skip(skip).collect(),
        };

        Ok(tasks)
    }

    async fn find_task(&self, id: Uuid, owner: Uuid) -> Result<Option<Task>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner.tasks.get(&id).filter(|t| t.owner == owner).cloned())
    }

    async fn save_task(&self, task: &Task) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;
        inner.tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn delete_task(&self, id: Uuid, owner: Uuid) -> Result<Option<Task>, AppError> {
        let mut inner = self.inner.lock().await;
        match inner.tasks.get(&id) {
            Some(task) if task.owner == owner => Ok(inner.tasks.remove(&id)),
            _ => Ok(None),
        }
    }

    async fn delete_tasks_for_owner(&self, owner: Uuid) -> Result<u64, AppError> {
        let mut inner = self.inner.lock().await;
        let before = inner.tasks.len();
        inner.tasks.retain(|_, t| t.owner != owner);
        Ok((before - inner.tasks.len()) as u64)
    }
}
