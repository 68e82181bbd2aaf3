use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A unit of work owned by exactly one account.
///
/// `owner` is always set from the authenticated caller, never from input,
/// and every lookup predicate includes it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub description: String,
    pub completed: bool,
    pub owner: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input structure for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    #[validate(custom = "crate::models::not_blank")]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

/// Payload for task updates. Only description and completion may change;
/// anything else in the body is rejected at deserialization.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateTaskInput {
    #[validate(custom = "crate::models::not_blank")]
    pub description: Option<String>,
    pub completed: Option<bool>,
}

/// Query parameters accepted when listing tasks.
///
/// `sort_by` is `field` or `field:desc` over a fixed allow-list; see
/// [`crate::store::TaskSort`].
#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    pub completed: Option<bool>,
    pub sort_by: Option<String>,
    pub limit: Option<i64>,
    pub skip: Option<i64>,
}

impl Task {
    /// Creates a new `Task` owned by `owner`. The description is trimmed.
    pub fn new(input: TaskInput, owner: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            description: input.description.trim().to_string(),
            completed: input.completed,
            owner,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_creation() {
        let owner = Uuid::new_v4();
        let task = Task::new(
            TaskInput {
                description: "  water the plants  ".to_string(),
                completed: false,
            },
            owner,
        );
        assert_eq!(task.description, "water the plants");
        assert_eq!(task.owner, owner);
        assert!(!task.completed);
    }

    #[test]
    fn test_task_input_validation() {
        let valid = TaskInput {
            description: "buy milk".to_string(),
            completed: true,
        };
        assert!(valid.validate().is_ok());

        let blank = TaskInput {
            description: "   ".to_string(),
            completed: false,
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_completed_defaults_to_false() {
        let input: TaskInput = serde_json::from_str(r#"{"description": "buy milk"}"#).unwrap();
        assert!(!input.completed);
    }

    #[test]
    fn test_update_input_rejects_unknown_fields() {
        let result: Result<UpdateTaskInput, _> =
            serde_json::from_str(r#"{"completed": true, "owner": "nope"}"#);
        assert!(result.is_err());

        let ok: UpdateTaskInput = serde_json::from_str(r#"{"completed": true}"#).unwrap();
        assert_eq!(ok.completed, Some(true));
        assert!(ok.description.is_none());
    }
}
