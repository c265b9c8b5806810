/// Task endpoints
///
/// - `GET /api/tasks` - List tasks with their assignee
/// - `GET /api/tasks/:id` - Get one task
/// - `POST /api/tasks` - Create task
/// - `PUT /api/tasks/:id` - Partially update task
/// - `DELETE /api/tasks/:id` - Delete task
///
/// Every task in a response carries `assignedTo`: the assignee's
/// `{id, name, email}` or `null`.

use crate::{app::AppState, error::ApiResult, extract::ApiJson, routes::MessageResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use taskhub_shared::{
    models::task::TaskWithAssignee,
    services::tasks::{CreateTaskRequest, UpdateTaskRequest},
    validation::parse_id,
};

/// List all tasks
///
/// # Errors
///
/// - `500 Internal Server Error`: Database failure
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<TaskWithAssignee>>> {
    Ok(Json(state.tasks.list().await?))
}

/// Get a task by ID
///
/// # Errors
///
/// - `400 Bad Request`: ID is not an integer
/// - `404 Not Found`: No such task
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TaskWithAssignee>> {
    let id = parse_id(&id, "task")?;
    Ok(Json(state.tasks.get(id).await?))
}

/// Create a task
///
/// # Endpoint
///
/// ```text
/// POST /api/tasks
/// Content-Type: application/json
///
/// {
///   "title": "Fix bug",
///   "description": "Crash on start",
///   "assignedToId": 2,
///   "createdById": 1
/// }
/// ```
///
/// The new task is always `pending`.
///
/// # Errors
///
/// - `400 Bad Request`: Title missing/blank or `createdById` missing
/// - `404 Not Found`: Task vanished before it could be re-read
pub async fn create_task(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskWithAssignee>)> {
    let task = state.tasks.create(req).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Partially update a task
///
/// Fields left out of the body keep their stored value.
///
/// # Errors
///
/// - `400 Bad Request`: ID is not an integer, blank title, unknown status
/// - `404 Not Found`: No such task
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateTaskRequest>,
) -> ApiResult<Json<TaskWithAssignee>> {
    let id = parse_id(&id, "task")?;
    Ok(Json(state.tasks.update(id, req).await?))
}

/// Delete a task
///
/// # Errors
///
/// - `400 Bad Request`: ID is not an integer
/// - `404 Not Found`: No such task
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id, "task")?;
    state.tasks.delete(id).await?;
    Ok(Json(MessageResponse::new("Task deleted successfully")))
}
