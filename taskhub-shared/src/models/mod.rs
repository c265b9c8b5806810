/// Database models for TaskHub
///
/// # Models
///
/// - `user`: User accounts (unique email)
/// - `task`: Tasks with an optional assignee

pub mod task;
pub mod user;
