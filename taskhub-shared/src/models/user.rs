/// User model and database operations
///
/// Values reaching this module are already normalized by the user service
/// (name trimmed, email trimmed and lowercased).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id SERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT users_email_key UNIQUE (email)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::models::user::{User, CreateUser};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     name: "Ann".to_string(),
///     email: "ann@example.com".to_string(),
/// }).await?;
///
/// let found = User::find_by_email(&pool, "ann@example.com").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Name of the unique constraint guarding `users.email`
pub const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID
    pub id: i32,

    /// Display name
    pub name: String,

    /// Email address, unique across all users
    pub email: String,

    /// When the user was created
    pub created_at: DateTime<Utc>,

    /// When the user was last updated
    pub updated_at: DateTime<Utc>,
}

/// Public projection of a user: `{id, name, email}`
///
/// Used by the user listing, the get-by-id endpoint and as the
/// `assignedTo` object embedded in tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
}

/// Full replacement values for an existing user
///
/// The service merges the request with the stored record before calling
/// [`User::update`], so every field here is written.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub name: String,
    pub email: String,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns a database error on connection failure or if the email is
    /// already taken (`users_email_key` violation).
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email)
            VALUES ($1, $2)
            RETURNING id, name, email, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by (already normalized) email address
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Overwrites name and email; `updated_at` is set to the current time
    ///
    /// Returns `None` if the user no longer exists.
    pub async fn update(
        pool: &PgPool,
        id: i32,
        data: UserChanges,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, email = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Deletes a user by ID
    ///
    /// Tasks referencing the user are left untouched.
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists every user's public projection in storage order
    pub async fn list_summaries(pool: &PgPool) -> Result<Vec<UserSummary>, sqlx::Error> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, name, email
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Gets a user's public projection by ID
    pub async fn find_summary(pool: &PgPool, id: i32) -> Result<Option<UserSummary>, sqlx::Error> {
        let user = sqlx::query_as::<_, UserSummary>(
            "SELECT id, name, email FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serializes_camel_case() {
        let now = Utc::now();
        let user = User {
            id: 1,
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["email"], "ann@example.com");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_summary_from_user() {
        let now = Utc::now();
        let user = User {
            id: 7,
            name: "Bo".to_string(),
            email: "bo@example.com".to_string(),
            created_at: now,
            updated_at: now,
        };

        let summary = UserSummary::from(user);
        assert_eq!(
            summary,
            UserSummary {
                id: 7,
                name: "Bo".to_string(),
                email: "bo@example.com".to_string(),
            }
        );

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 3);
    }
}
