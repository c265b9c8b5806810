/// User service
///
/// Validates user input and enforces email uniqueness before touching the
/// `users` table.
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::db::{Database, DatabaseConfig};
/// use taskhub_shared::services::users::{CreateUserRequest, UserService};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let db = Database::connect(DatabaseConfig::default()).await?;
/// let users = UserService::new(db);
///
/// let user = users.create(CreateUserRequest {
///     name: Some("Ann".to_string()),
///     email: Some("Ann@Example.com ".to_string()),
/// }).await?;
/// assert_eq!(user.email, "ann@example.com");
/// # Ok(())
/// # }
/// ```

use crate::db::Database;
use crate::models::user::{CreateUser, User, UserChanges, UserSummary};
use crate::services::error::{ServiceError, ServiceResult};
use crate::validation::{self, EMAIL_PATTERN};
use serde::Deserialize;
use tracing::{debug, info};
use validator::Validate;

const FIELD_ORDER: &[&str] = &["name", "email"];

/// Create user request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Update user request body; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Normalized user fields, validated before they are written
#[derive(Debug, Validate)]
struct UserFields {
    #[validate(length(min = 1, message = "Name is required"))]
    name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        regex(path = *EMAIL_PATTERN, message = "Invalid email format")
    )]
    email: String,
}

impl UserFields {
    fn normalized(name: &str, email: &str) -> Self {
        Self {
            name: validation::normalize_text(name),
            email: validation::normalize_email(email),
        }
    }

    fn check(self) -> ServiceResult<Self> {
        self.validate()
            .map_err(|e| validation::into_service_error(e, FIELD_ORDER))?;
        Ok(self)
    }
}

/// User operations over the shared database context
#[derive(Debug, Clone)]
pub struct UserService {
    db: Database,
}

impl UserService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Lists all users as `{id, name, email}`
    pub async fn list(&self) -> ServiceResult<Vec<UserSummary>> {
        Ok(User::list_summaries(self.db.pool()).await?)
    }

    /// Creates a user
    ///
    /// # Errors
    ///
    /// - `Validation`: name or email missing/blank, or malformed email
    /// - `Conflict`: the normalized email is already in use
    pub async fn create(&self, req: CreateUserRequest) -> ServiceResult<User> {
        let fields = UserFields::normalized(
            req.name.as_deref().unwrap_or_default(),
            req.email.as_deref().unwrap_or_default(),
        )
        .check()?;

        if User::find_by_email(self.db.pool(), &fields.email).await?.is_some() {
            debug!(email = %fields.email, "Rejected duplicate email");
            return Err(ServiceError::Conflict("Email already exists".to_string()));
        }

        let user = User::create(
            self.db.pool(),
            CreateUser {
                name: fields.name,
                email: fields.email,
            },
        )
        .await?;

        info!(user_id = user.id, "User created");
        Ok(user)
    }

    /// Gets a user's `{id, name, email}`
    pub async fn get(&self, id: i32) -> ServiceResult<UserSummary> {
        User::find_summary(self.db.pool(), id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }

    /// Partially updates a user
    ///
    /// A changed email is re-validated and must not belong to another user.
    ///
    /// # Errors
    ///
    /// - `NotFound`: no user with this id
    /// - `Validation`: blank name, blank or malformed email
    /// - `Conflict`: the new email belongs to a different user
    pub async fn update(&self, id: i32, req: UpdateUserRequest) -> ServiceResult<User> {
        let current = User::find_by_id(self.db.pool(), id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        let fields = UserFields::normalized(
            req.name.as_deref().unwrap_or(&current.name),
            req.email.as_deref().unwrap_or(&current.email),
        )
        .check()?;

        if fields.email != current.email {
            let taken = User::find_by_email(self.db.pool(), &fields.email).await?;
            if taken.is_some_and(|other| other.id != id) {
                debug!(user_id = id, email = %fields.email, "Rejected duplicate email");
                return Err(ServiceError::Conflict("Email already exists".to_string()));
            }
        }

        let user = User::update(
            self.db.pool(),
            id,
            UserChanges {
                name: fields.name,
                email: fields.email,
            },
        )
        .await?
        .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        info!(user_id = id, "User updated");
        Ok(user)
    }

    /// Deletes a user; tasks referencing it are left as they are
    pub async fn delete(&self, id: i32) -> ServiceResult<()> {
        if !User::delete(self.db.pool(), id).await? {
            return Err(ServiceError::NotFound("User not found".to_string()));
        }

        info!(user_id = id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validation_message(result: ServiceResult<UserFields>) -> String {
        match result {
            Err(ServiceError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other.map(|f| f.email)),
        }
    }

    #[test]
    fn test_fields_are_normalized() {
        let fields = UserFields::normalized("  Ann ", " Ann@Example.com ").check().unwrap();
        assert_eq!(fields.name, "Ann");
        assert_eq!(fields.email, "ann@example.com");
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let msg = validation_message(UserFields::normalized("   ", "ann@example.com").check());
        assert_eq!(msg, "Name is required");
    }

    #[test]
    fn test_name_error_reported_before_email_error() {
        let msg = validation_message(UserFields::normalized("", "").check());
        assert_eq!(msg, "Name is required");
    }

    #[test]
    fn test_missing_email_is_rejected() {
        let msg = validation_message(UserFields::normalized("Ann", "  ").check());
        assert_eq!(msg, "Email is required");
    }

    #[test]
    fn test_malformed_email_is_rejected() {
        let msg = validation_message(UserFields::normalized("Ann", "ann@example").check());
        assert_eq!(msg, "Invalid email format");
    }

    #[test]
    fn test_request_deserializes_partial_body() {
        let req: UpdateUserRequest = serde_json::from_str(r#"{"name": "Bo"}"#).unwrap();
        assert_eq!(req.name.as_deref(), Some("Bo"));
        assert!(req.email.is_none());
    }
}
