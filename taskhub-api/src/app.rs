/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use taskhub_api::{app::{build_router, AppState}, config::Config};
/// use taskhub_shared::db::Database;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let db = Database::connect(config.database.clone()).await?;
/// let app = build_router(AppState::new(db, config));
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, routes};
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use taskhub_shared::{
    db::Database,
    realtime::Relay,
    services::{TaskService, UserService},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{warn, Level};

/// Shared application state
///
/// Cloned into every handler through Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database handle
    pub db: Database,

    /// Application configuration
    pub config: Arc<Config>,

    /// Task operations
    pub tasks: TaskService,

    /// User operations
    pub users: UserService,

    /// Realtime relay shared by all socket connections
    pub relay: Arc<Relay>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            tasks: TaskService::new(db.clone()),
            users: UserService::new(db.clone()),
            relay: Arc::new(Relay::default()),
            config: Arc::new(config),
            db,
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── /health                # Health check
/// ├── /socket                # Realtime relay (WebSocket)
/// └── /api/
///     ├── /tasks
///     │   ├── GET  /         # List tasks
///     │   ├── POST /         # Create task
///     │   └── GET|PUT|DELETE /:id
///     └── /users
///         ├── GET  /         # List users
///         ├── POST /         # Create user
///         └── GET|PUT|DELETE /:id
/// ```
pub fn build_router(state: AppState) -> Router {
    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        );

    let user_routes = Router::new()
        .route(
            "/",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route(
            "/:id",
            get(routes::users::get_user)
                .put(routes::users::update_user)
                .delete(routes::users::delete_user),
        );

    let api_routes = Router::new()
        .nest("/tasks", task_routes)
        .nest("/users", user_routes);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/socket", get(routes::socket::socket_handler))
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config.api.cors_origin))
        .with_state(state)
}

/// CORS for the single configured origin
///
/// An origin that is not a valid header value allows no cross-origin calls.
fn cors_layer(origin: &str) -> CorsLayer {
    let origins: Vec<HeaderValue> = match origin.parse() {
        Ok(value) => vec![value],
        Err(_) => {
            warn!(origin = %origin, "CORS_ORIGIN is not a valid header value");
            Vec::new()
        }
    };

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}
