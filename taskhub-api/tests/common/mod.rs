/// Common test utilities for integration tests
///
/// - `TestContext::offline()` builds the router over a lazy pool that never
///   connects; it serves every request rejected before the database is touched.
/// - `TestContext::new()` connects to `DATABASE_URL` and applies the schema.
///   Tests using it are `#[ignore]`d; run them with `cargo test -- --ignored`.

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use taskhub_api::app::{build_router, AppState};
use taskhub_api::config::Config;
use taskhub_shared::db::migrations::sync_schema;
use taskhub_shared::db::{Database, DatabaseConfig};
use tower::Service as _;
use uuid::Uuid;

/// Test context containing the router and its database handle
pub struct TestContext {
    pub db: Database,
    pub app: axum::Router,
}

impl TestContext {
    /// Router backed by a live database from `DATABASE_URL`
    pub async fn new() -> anyhow::Result<Self> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set for database tests"))?;

        let db = Database::from_pool(PgPool::connect(&url).await?);
        sync_schema(&db).await?;

        Ok(Self::with_database(db))
    }

    /// Router backed by a pool that is never opened
    pub fn offline() -> Self {
        Self::with_database(Database::connect_lazy(DatabaseConfig::default()))
    }

    fn with_database(db: Database) -> Self {
        let app = build_router(AppState::new(db.clone(), Config::default()));
        TestContext { db, app }
    }

    /// Sends a request with an optional JSON body
    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> Response<Body> {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.app.clone().call(request).await.unwrap()
    }

    /// Sends a request and returns its status and parsed JSON body
    pub async fn json(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let response = self.request(method, uri, body).await;
        read_json(response).await
    }
}

/// Reads a response body as JSON
pub async fn read_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}

/// Email address no other test run will have used
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4().simple())
}
