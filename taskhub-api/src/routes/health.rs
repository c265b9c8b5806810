/// Health check endpoint
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "pool": { "active_connections": 1, "idle_connections": 4, "total_connections": 5 }
/// }
/// ```

use crate::app::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use taskhub_shared::db::pool::{health_check as db_health_check, PoolStats};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,

    /// Application version
    pub version: String,

    /// "connected" or "disconnected"
    pub database: String,

    /// Connection pool usage
    pub pool: PoolStats,
}

/// Reports service health including database connectivity
///
/// Always answers 200; a lost database shows up as `"degraded"`.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let connected = db_health_check(state.db.pool()).await.is_ok();

    Json(HealthResponse {
        status: if connected { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if connected { "connected" } else { "disconnected" }.to_string(),
        pool: state.db.stats(),
    })
}
