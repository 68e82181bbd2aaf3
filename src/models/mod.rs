pub mod account;
pub mod task;

pub use account::{Account, RegisterInput, UpdateAccountInput};
pub use task::{Task, TaskInput, TaskListQuery, UpdateTaskInput};

use validator::ValidationError;

/// Rejects values that are empty or whitespace-only. Fields using this are
/// trimmed before storage, so a blank value would otherwise sneak through a
/// plain length check.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("must not be blank"));
    }
    Ok(())
}

/// Password policy carried over from the account rules: the password may not
/// contain the word "password" in any casing.
pub fn password_policy(value: &str) -> Result<(), ValidationError> {
    if value.to_lowercase().contains("password") {
        return Err(ValidationError::new("must not contain \"password\""));
    }
    Ok(())
}
