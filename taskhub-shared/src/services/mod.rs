/// Business services
///
/// Each service owns a clone of the [`crate::db::Database`] context and
/// exposes one method per API operation.
///
/// - `tasks`: Task CRUD with assignee join
/// - `users`: User CRUD with email normalization and uniqueness
/// - `error`: Shared error taxonomy

pub mod error;
pub mod tasks;
pub mod users;

pub use error::{ServiceError, ServiceResult};
pub use tasks::TaskService;
pub use users::UserService;
