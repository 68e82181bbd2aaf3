use crate::{
    auth::AuthSession,
    error::AppError,
    models::{Task, TaskInput, TaskListQuery, UpdateTaskInput},
    state::AppState,
    store::TaskFilter,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

/// Shared by every handler: the owner id is part of the store predicate, so
/// a task owned by someone else and a task that never existed produce the
/// same response.
const TASK_NOT_FOUND: &str = "task not found";

/// Lists the caller's tasks.
///
/// ## Query Parameters:
/// - `completed` (optional): filter by completion state.
/// - `sort_by` (optional): `created_at`, `updated_at` or `completed`,
///   optionally suffixed `:desc`. Anything else is a validation error.
/// - `limit` / `skip` (optional): pagination.
#[get("")]
pub async fn list_tasks(
    state: web::Data<AppState>,
    session: AuthSession,
    query: web::Query<TaskListQuery>,
) -> Result<impl Responder, AppError> {
    let filter = TaskFilter::try_from(query.into_inner())?;
    let tasks = state
        .store
        .find_tasks(session.account.id, &filter)
        .await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task owned by the caller. The owner always comes from the
/// authenticated session, never from the payload.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    session: AuthSession,
    input: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    input.validate()?;

    let task = Task::new(input.into_inner(), session.account.id);
    state.store.save_task(&task).await?;

    Ok(HttpResponse::Created().json(task))
}

/// Fetches one of the caller's tasks by id.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    session: AuthSession,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = state
        .store
        .find_task(task_id.into_inner(), session.account.id)
        .await?
        .ok_or_else(|| AppError::NotFound(TASK_NOT_FOUND.into()))?;

    Ok(HttpResponse::Ok().json(task))
}

/// Updates one of the caller's tasks. Only `description` and `completed`
/// are accepted; unknown fields are rejected at deserialization.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    session: AuthSession,
    task_id: web::Path<Uuid>,
    input: web::Json<UpdateTaskInput>,
) -> Result<impl Responder, AppError> {
    input.validate()?;

    let mut task = state
        .store
        .find_task(task_id.into_inner(), session.account.id)
        .await?
        .ok_or_else(|| AppError::NotFound(TASK_NOT_FOUND.into()))?;

    let input = input.into_inner();
    if let Some(description) = input.description {
        task.description = description.trim().to_string();
    }
    if let Some(completed) = input.completed {
        task.completed = completed;
    }
    task.updated_at = Utc::now();
    state.store.save_task(&task).await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes one of the caller's tasks, returning the removed task.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    session: AuthSession,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = state
        .store
        .delete_task(task_id.into_inner(), session.account.id)
        .await?
        .ok_or_else(|| AppError::NotFound(TASK_NOT_FOUND.into()))?;

    Ok(HttpResponse::Ok().json(task))
}
