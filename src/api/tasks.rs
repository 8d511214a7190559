//! Handlers for the `/tasks` resource.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection, rejection::PathRejection},
    http::StatusCode,
};
use tracing::{debug, error, warn};

use super::ApiState;
use crate::db::is_constraint_violation;
use crate::error::{ApiError, ApiResult};
use crate::types::{CreateTaskRequest, MessageResponse, Task, TaskChanges, UpdateTaskRequest};

/// Unwrap a body extraction, reporting axum's rejection as a JSON 400.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected request body");
            Err(ApiError::invalid_body(rejection.body_text()))
        }
    }
}

fn task_id(id: Result<Path<i64>, PathRejection>) -> ApiResult<i64> {
    match id {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected task id");
            Err(ApiError::invalid_body("Task id must be an integer").with_field("id"))
        }
    }
}

/// Log the driver error and hand back a response that does not contain it.
fn storage_failure(op: &str, message: &str, err: anyhow::Error) -> ApiError {
    error!(operation = op, error = %err, "Storage operation failed");
    ApiError::storage(message)
}

/// `GET /tasks`
pub(super) async fn list_tasks(State(state): State<ApiState>) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state
        .db()
        .list_tasks()
        .map_err(|e| storage_failure("list", "Cannot retrieve tasks", e))?;
    debug!(count = tasks.len(), "Listed tasks");
    Ok(Json(tasks))
}

/// `GET /tasks/{id}`
pub(super) async fn get_task(
    State(state): State<ApiState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Task>> {
    let id = task_id(id)?;
    match state.db().get_task(id) {
        Ok(Some(task)) => Ok(Json(task)),
        Ok(None) => {
            debug!(task_id = id, "Task not found");
            Err(ApiError::task_not_found())
        }
        Err(e) => Err(storage_failure("get", "Cannot retrieve task", e)),
    }
}

/// `POST /tasks`
pub(super) async fn create_task(
    State(state): State<ApiState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let new_task = body(payload)?.validate().inspect_err(|e| {
        warn!(error = %e, "Create request failed validation");
    })?;

    let task = state
        .db()
        .create_task(new_task)
        .map_err(|e| storage_failure("create", "Failed to create task", e))?;
    debug!(task_id = task.id, "Created task");

    Ok((StatusCode::CREATED, Json(task)))
}

/// `PUT /tasks/{id}`
pub(super) async fn update_task(
    State(state): State<ApiState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let id = task_id(id)?;
    let changes = TaskChanges::from(body(payload)?);
    let missing = changes.missing_field();
    let status = changes.status.clone();

    // An unknown id matches no row, so NOT NULL never fires and it falls to 404
    let updated = match state.db().update_task(id, changes) {
        Ok(updated) => updated,
        Err(e) => match missing.filter(|_| is_constraint_violation(&e)) {
            Some(field) => {
                warn!(task_id = id, field, "Update left a required field empty");
                return Err(ApiError::missing_field(field));
            }
            None => return Err(storage_failure("update", "Failed to update task", e)),
        },
    };
    if !updated {
        debug!(task_id = id, "Task not found for update");
        return Err(ApiError::task_not_found());
    }

    debug!(task_id = id, status = ?status, "Updated task");
    Ok(Json(MessageResponse::new("Task updated successfully")))
}

/// `DELETE /tasks/{id}`
pub(super) async fn delete_task(
    State(state): State<ApiState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let id = task_id(id)?;
    let deleted = state
        .db()
        .delete_task(id)
        .map_err(|e| storage_failure("delete", "Failed to delete task", e))?;
    if !deleted {
        debug!(task_id = id, "Task not found for delete");
        return Err(ApiError::task_not_found());
    }

    debug!(task_id = id, "Deleted task");
    Ok(Json(MessageResponse::new("Task deleted successfully")))
}
