/// API route handlers
///
/// Handlers are organized by resource:
///
/// - `health`: Health check endpoint
/// - `tasks`: Task CRUD
/// - `users`: User CRUD
/// - `socket`: Realtime relay over WebSocket

pub mod health;
pub mod socket;
pub mod tasks;
pub mod users;

use serde::{Deserialize, Serialize};

/// `{ "message": ... }` body returned by deletes
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
