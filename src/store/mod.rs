//!
//! # Credential Store
//!
//! Persistence is an external collaborator behind the [`Store`] trait. The
//! core never talks to a database directly; it loads, saves and deletes
//! whole records through this interface. Two implementations exist:
//! [`postgres::PgStore`] for production and [`memory::MemStore`] for tests.
//!
//! Every task-reading or task-mutating method takes the owner id as part of
//! the predicate. Implementations must never return or touch a task whose
//! owner differs from the one given.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Account, Task, TaskListQuery};

pub use memory::MemStore;
pub use postgres::PgStore;

/// Fields a task listing may be sorted by. A fixed allow-list: anything not
/// named here is rejected before it reaches a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CreatedAt,
    UpdatedAt,
    Completed,
}

impl SortKey {
    /// The column name used by the SQL backend.
    pub fn column(self) -> &'static str {
        match self {
            SortKey::CreatedAt => "created_at",
            SortKey::UpdatedAt => "updated_at",
            SortKey::Completed => "completed",
        }
    }
}

/// A parsed sort directive, from `field` or `field:desc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSort {
    pub key: SortKey,
    pub descending: bool,
}

impl FromStr for TaskSort {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, dir) = match s.split_once(':') {
            Some((field, dir)) => (field, dir),
            None => (s, "asc"),
        };
        let key = match field {
            "created_at" => SortKey::CreatedAt,
            "updated_at" => SortKey::UpdatedAt,
            "completed" => SortKey::Completed,
            other => {
                return Err(AppError::ValidationError(format!(
                    "unknown sort field: {}",
                    other
                )))
            }
        };
        let descending = match dir {
            "asc" => false,
            "desc" => true,
            other => {
                return Err(AppError::ValidationError(format!(
                    "unknown sort direction: {}",
                    other
                )))
            }
        };
        Ok(TaskSort { key, descending })
    }
}

/// Scoping options for a task listing. The owner is passed separately and is
/// always applied.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub completed: Option<bool>,
    pub sort: Option<TaskSort>,
    pub limit: Option<i64>,
    pub skip: Option<i64>,
}

impl TryFrom<TaskListQuery> for TaskFilter {
    type Error = AppError;

    fn try_from(query: TaskListQuery) -> Result<Self, Self::Error> {
        let sort = query.sort_by.as_deref().map(TaskSort::from_str).transpose()?;
        Ok(TaskFilter {
            completed: query.completed,
            sort,
            limit: query.limit,
            skip: query.skip,
        })
    }
}

/// The persistence collaborator the core depends on.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_account_by_id(&self, id: Uuid) -> Result<Option<Account>, AppError>;

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, AppError>;

    /// Upserts the whole account record, token list included. Session
    /// mutations are read-modify-write through this method; the whole token
    /// list is written back (last-write-wins).
    async fn save_account(&self, account: &Account) -> Result<(), AppError>;

    /// Removes the account record. Returns `false` if it was already gone.
    async fn delete_account(&self, id: Uuid) -> Result<bool, AppError>;

    async fn find_tasks(&self, owner: Uuid, filter: &TaskFilter) -> Result<Vec<Task>, AppError>;

    async fn find_task(&self, id: Uuid, owner: Uuid) -> Result<Option<Task>, AppError>;

    async fn save_task(&self, task: &Task) -> Result<(), AppError>;

    /// Deletes one task scoped to its owner, returning it if it existed.
    async fn delete_task(&self, id: Uuid, owner: Uuid) -> Result<Option<Task>, AppError>;

    /// Bulk-deletes every task owned by `owner`, returning how many went.
    async fn delete_tasks_for_owner(&self, owner: Uuid) -> Result<u64, AppError>;
}
