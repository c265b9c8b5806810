/// Task model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'in_progress', 'completed');
///
/// CREATE TABLE tasks (
///     id SERIAL PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'pending',
///     assigned_to_id INTEGER,
///     created_by_id INTEGER NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// The assignee is resolved with an explicit `LEFT JOIN users`, so a task
/// whose assignee was deleted comes back with `assignedTo: null`.
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::models::task::{Task, CreateTask};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, CreateTask {
///     title: "Fix bug".to_string(),
///     description: None,
///     assigned_to_id: Some(1),
///     created_by_id: 1,
/// }).await?;
///
/// let joined = Task::find_with_assignee(&pool, task.id).await?;
/// # Ok(())
/// # }
/// ```

use crate::models::user::UserSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Task progress status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started (initial state)
    #[default]
    Pending,

    /// Being worked on
    InProgress,

    /// Done
    Completed,
}

impl TaskStatus {
    /// Wire and database representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown status string
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid status: {0}")]
pub struct ParseTaskStatusError(pub String);

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(ParseTaskStatusError(other.to_string())),
        }
    }
}

/// Stored task row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: i32,

    /// Short title (never blank)
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Current status
    pub status: TaskStatus,

    /// Assignee user ID (None = unassigned)
    pub assigned_to_id: Option<i32>,

    /// Creator user ID (not checked against the users table)
    pub created_by_id: i32,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Task joined with its assignee's public projection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskWithAssignee {
    #[serde(flatten)]
    pub task: Task,

    /// Assigned user, or null when unassigned / dangling
    pub assigned_to: Option<UserSummary>,
}

/// Input for creating a task; status always starts as pending
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub assigned_to_id: Option<i32>,
    pub created_by_id: i32,
}

/// Full replacement values for the mutable task columns
#[derive(Debug, Clone)]
pub struct TaskChanges {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub assigned_to_id: Option<i32>,
}

impl TaskChanges {
    /// Starts from the stored values, so callers only overwrite what changed
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            assigned_to_id: task.assigned_to_id,
        }
    }
}

/// Flat row produced by the assignee join
#[derive(Debug, sqlx::FromRow)]
struct TaskAssigneeRow {
    #[sqlx(flatten)]
    task: Task,
    assignee_id: Option<i32>,
    assignee_name: Option<String>,
    assignee_email: Option<String>,
}

impl From<TaskAssigneeRow> for TaskWithAssignee {
    fn from(row: TaskAssigneeRow) -> Self {
        let assigned_to = match (row.assignee_id, row.assignee_name, row.assignee_email) {
            (Some(id), Some(name), Some(email)) => Some(UserSummary { id, name, email }),
            _ => None,
        };

        Self {
            task: row.task,
            assigned_to,
        }
    }
}

const SELECT_WITH_ASSIGNEE: &str = r#"
    SELECT t.id, t.title, t.description, t.status, t.assigned_to_id, t.created_by_id,
           t.created_at, t.updated_at,
           u.id AS assignee_id, u.name AS assignee_name, u.email AS assignee_email
    FROM tasks t
    LEFT JOIN users u ON u.id = t.assigned_to_id
"#;

impl Task {
    /// Creates a new task in the pending state
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, assigned_to_id, created_by_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, status, assigned_to_id, created_by_id,
                      created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(TaskStatus::Pending)
        .bind(data.assigned_to_id)
        .bind(data.created_by_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID (without the assignee)
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, assigned_to_id, created_by_id,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID joined with its assignee
    pub async fn find_with_assignee(
        pool: &PgPool,
        id: i32,
    ) -> Result<Option<TaskWithAssignee>, sqlx::Error> {
        let query = format!("{} WHERE t.id = $1", SELECT_WITH_ASSIGNEE);

        let row = sqlx::query_as::<_, TaskAssigneeRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(TaskWithAssignee::from))
    }

    /// Lists all tasks joined with their assignees, in storage order
    pub async fn list_with_assignee(pool: &PgPool) -> Result<Vec<TaskWithAssignee>, sqlx::Error> {
        let query = format!("{} ORDER BY t.id", SELECT_WITH_ASSIGNEE);

        let rows = sqlx::query_as::<_, TaskAssigneeRow>(&query)
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(TaskWithAssignee::from).collect())
    }

    /// Overwrites the mutable columns; `updated_at` is set to the current time
    ///
    /// Returns `None` if the task no longer exists.
    pub async fn update(
        pool: &PgPool,
        id: i32,
        data: TaskChanges,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $2, description = $3, status = $4, assigned_to_id = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, status, assigned_to_id, created_by_id,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.assigned_to_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Permanently deletes a task
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
