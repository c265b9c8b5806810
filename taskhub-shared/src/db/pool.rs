/// Database context and connection pool management
///
/// The [`Database`] context owns the PostgreSQL connection pool. It is built
/// once at startup, handed to every service that needs persistence, and
/// closed explicitly during shutdown.
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::db::pool::{Database, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let db = Database::connect(DatabaseConfig::default()).await?;
///
///     let row: (i64,) = sqlx::query_as("SELECT $1")
///         .bind(42i64)
///         .fetch_one(db.pool())
///         .await?;
///
///     db.close().await;
///     Ok(())
/// }
/// ```

use serde::Serialize;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for the database connection
///
/// Connection parameters are kept as separate fields (rather than a URL) so
/// that passwords containing reserved characters need no escaping.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Database name
    pub database: String,

    /// Role used to connect
    pub username: String,

    /// Password for `username`
    pub password: String,

    /// Server host name
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Timeout for acquiring a connection from the pool (seconds)
    pub acquire_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database: "taskdb".to_string(),
            username: "postgres".to_string(),
            password: "0292".to_string(),
            host: "localhost".to_string(),
            port: 5432,
            max_connections: 10,
            acquire_timeout_seconds: 30,
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_seconds", &self.acquire_timeout_seconds)
            .finish()
    }
}

impl DatabaseConfig {
    /// Builds sqlx connect options from the individual parameters
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.database)
    }

    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_seconds))
    }
}

/// Explicit data-access context shared by the services
///
/// Cloning is cheap: the underlying pool is reference counted.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connects to PostgreSQL and verifies the connection
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable, the credentials are
    /// rejected, or the health check query fails.
    pub async fn connect(config: DatabaseConfig) -> Result<Self, sqlx::Error> {
        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            max_connections = config.max_connections,
            "Connecting to database"
        );

        let pool = config
            .pool_options()
            .connect_with(config.connect_options())
            .await?;

        health_check(&pool).await?;

        info!("Database connection pool created successfully");
        Ok(Self { pool })
    }

    /// Builds a context whose connections are only opened on first use
    pub fn connect_lazy(config: DatabaseConfig) -> Self {
        let pool = config
            .pool_options()
            .connect_lazy_with(config.connect_options());
        Self { pool }
    }

    /// Wraps an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the underlying connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Gets current pool statistics
    pub fn stats(&self) -> PoolStats {
        let size = self.pool.size();
        let idle = self.pool.num_idle();

        PoolStats {
            active_connections: size.saturating_sub(idle as u32) as usize,
            idle_connections: idle,
            total_connections: size as usize,
        }
    }

    /// Gracefully closes the connection pool
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

/// Pool statistics for monitoring
#[derive(Debug, Clone, Serialize)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub active_connections: usize,

    /// Number of idle connections available
    pub idle_connections: usize,

    /// Total connections in the pool
    pub total_connections: usize,
}

/// Performs a health check on the database connection
///
/// # Errors
///
/// Returns an error if the query fails or returns an unexpected value
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    debug!("Performing database health check");

    let result: (i32,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;

    if result.0 == 1 {
        debug!("Database health check passed");
        Ok(())
    } else {
        warn!("Database health check returned unexpected value: {}", result.0);
        Err(sqlx::Error::Protocol(
            "Health check returned unexpected value".into(),
        ))
    }
}
