/// Task service
///
/// Validates task input, executes the writes and returns tasks joined with
/// their assignee.
///
/// Create and update are each two independent statements (write, then
/// re-read with the join); there is no transaction around them.

use crate::db::Database;
use crate::models::task::{CreateTask, Task, TaskChanges, TaskStatus, TaskWithAssignee};
use crate::services::error::{ServiceError, ServiceResult};
use crate::validation;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

const FIELD_ORDER: &[&str] = &["title", "created_by_id"];

/// Create task request body
///
/// Any `status` sent by the client is ignored: new tasks start as pending.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "validation::nullable_id")]
    pub assigned_to_id: Option<Option<i32>>,
    pub created_by_id: Option<i32>,
}

/// Update task request body
///
/// Absent fields keep their stored value. `description` and `assignedToId`
/// may be cleared with an explicit `null` (or `""` for the assignee). An
/// empty `status` keeps the stored status.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "validation::double_option")]
    pub description: Option<Option<String>>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "validation::nullable_id")]
    pub assigned_to_id: Option<Option<i32>>,
}

#[derive(Debug, Validate)]
struct TaskFields {
    #[validate(length(min = 1, message = "Title is required"))]
    title: String,

    #[validate(required(message = "createdById is required"))]
    created_by_id: Option<i32>,
}

impl TaskFields {
    fn check(self) -> ServiceResult<(String, i32)> {
        self.validate()
            .map_err(|e| validation::into_service_error(e, FIELD_ORDER))?;

        let created_by_id = self
            .created_by_id
            .ok_or_else(|| ServiceError::Validation("createdById is required".to_string()))?;

        Ok((self.title, created_by_id))
    }
}

/// Id sent on create; `0` counts as not provided
fn provided_id(id: Option<i32>) -> Option<i32> {
    id.filter(|&id| id != 0)
}

fn parse_status(raw: &str) -> ServiceResult<TaskStatus> {
    raw.parse::<TaskStatus>()
        .map_err(|e| ServiceError::Validation(e.to_string()))
}

/// Builds the merged column values for an update
fn merge_update(current: &Task, req: UpdateTaskRequest) -> ServiceResult<TaskChanges> {
    let mut changes = TaskChanges::from_task(current);

    if let Some(title) = req.title {
        changes.title = title;
    }
    if let Some(description) = req.description {
        changes.description = validation::normalize_optional_text(description.as_deref());
    }
    if let Some(status) = req.status.as_deref().filter(|s| !s.is_empty()) {
        changes.status = parse_status(status)?;
    }
    if let Some(assigned_to_id) = req.assigned_to_id {
        changes.assigned_to_id = assigned_to_id;
    }

    let (title, _) = TaskFields {
        title: validation::normalize_text(&changes.title),
        created_by_id: Some(current.created_by_id),
    }
    .check()?;
    changes.title = title;

    Ok(changes)
}

/// Task operations over the shared database context
#[derive(Debug, Clone)]
pub struct TaskService {
    db: Database,
}

impl TaskService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Lists all tasks joined with their assignees
    pub async fn list(&self) -> ServiceResult<Vec<TaskWithAssignee>> {
        Ok(Task::list_with_assignee(self.db.pool()).await?)
    }

    /// Gets one task joined with its assignee
    pub async fn get(&self, id: i32) -> ServiceResult<TaskWithAssignee> {
        Task::find_with_assignee(self.db.pool(), id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Task not found".to_string()))
    }

    /// Creates a pending task
    ///
    /// # Errors
    ///
    /// - `Validation`: title missing/blank, or `createdById` missing or 0
    /// - `NotFound`: the task could not be re-read after insertion
    ///
    /// An `assignedToId` of 0 leaves the task unassigned.
    pub async fn create(&self, req: CreateTaskRequest) -> ServiceResult<TaskWithAssignee> {
        let (title, created_by_id) = TaskFields {
            title: validation::normalize_text(req.title.as_deref().unwrap_or_default()),
            created_by_id: provided_id(req.created_by_id),
        }
        .check()?;

        let task = Task::create(
            self.db.pool(),
            CreateTask {
                title,
                description: validation::normalize_optional_text(req.description.as_deref()),
                assigned_to_id: provided_id(req.assigned_to_id.flatten()),
                created_by_id,
            },
        )
        .await?;

        info!(task_id = task.id, created_by_id, "Task created");

        Task::find_with_assignee(self.db.pool(), task.id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Task not found after creation".to_string()))
    }

    /// Partially updates a task
    ///
    /// # Errors
    ///
    /// - `NotFound`: no task with this id
    /// - `Validation`: blank title or unknown status
    pub async fn update(&self, id: i32, req: UpdateTaskRequest) -> ServiceResult<TaskWithAssignee> {
        let current = Task::find_by_id(self.db.pool(), id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Task not found".to_string()))?;

        let changes = merge_update(&current, req)?;
        let status = changes.status;

        Task::update(self.db.pool(), id, changes)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Task not found".to_string()))?;

        info!(task_id = id, status = %status, "Task updated");

        Task::find_with_assignee(self.db.pool(), id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Task not found after update".to_string()))
    }

    /// Permanently deletes a task
    pub async fn delete(&self, id: i32) -> ServiceResult<()> {
        if !Task::delete(self.db.pool(), id).await? {
            return Err(ServiceError::NotFound("Task not found".to_string()));
        }

        info!(task_id = id, "Task deleted");
        Ok(())
    }
}
