/// User endpoints
///
/// - `GET /api/users` - List users
/// - `POST /api/users` - Create user
/// - `GET /api/users/:id` - Get user
/// - `PUT /api/users/:id` - Partially update user
/// - `DELETE /api/users/:id` - Delete user

use crate::{app::AppState, error::ApiResult, extract::ApiJson, routes::MessageResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use taskhub_shared::{
    models::user::{User, UserSummary},
    services::users::{CreateUserRequest, UpdateUserRequest},
    validation::parse_id,
};

/// List all users as `{id, name, email}`
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserSummary>>> {
    Ok(Json(state.users.list().await?))
}

/// Create a user
///
/// # Endpoint
///
/// ```text
/// POST /api/users
/// Content-Type: application/json
///
/// { "name": "Ann", "email": "Ann@Example.com " }
/// ```
///
/// The email is stored trimmed and lowercased (`ann@example.com`).
///
/// # Errors
///
/// - `400 Bad Request`: Name/email missing or blank, malformed email
/// - `409 Conflict`: Email already exists
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state.users.create(req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a user by ID
///
/// # Errors
///
/// - `400 Bad Request`: ID is not an integer
/// - `404 Not Found`: No such user
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserSummary>> {
    let id = parse_id(&id, "user")?;
    Ok(Json(state.users.get(id).await?))
}

/// Partially update a user
///
/// # Errors
///
/// - `400 Bad Request`: ID is not an integer, blank name, malformed email
/// - `404 Not Found`: No such user
/// - `409 Conflict`: Email belongs to another user
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    let id = parse_id(&id, "user")?;
    Ok(Json(state.users.update(id, req).await?))
}

/// Delete a user
///
/// Tasks assigned to or created by the user are not touched.
///
/// # Errors
///
/// - `400 Bad Request`: ID is not an integer
/// - `404 Not Found`: No such user
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id, "user")?;
    state.users.delete(id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
