/// Schema synchronization
///
/// The schema lives in the embedded `migrations/` directory of this crate and
/// is applied at startup before the server accepts connections. Every
/// migration is additive; already applied migrations are skipped.
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::db::pool::{Database, DatabaseConfig};
/// use taskhub_shared::db::migrations::{sync_schema, get_migration_status};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let db = Database::connect(DatabaseConfig::default()).await?;
/// sync_schema(&db).await?;
///
/// let status = get_migration_status(&db).await?;
/// println!("Applied {} migrations", status.applied_migrations);
/// # Ok(())
/// # }
/// ```

use super::pool::Database;
use tracing::{debug, info, warn};

/// Migration status information
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    /// Number of migrations that have been applied
    pub applied_migrations: usize,

    /// Latest applied migration version
    pub latest_version: Option<i64>,
}

/// Applies all pending schema migrations
///
/// # Errors
///
/// Returns an error if a migration fails to execute or if an applied
/// migration no longer matches its embedded checksum.
pub async fn sync_schema(db: &Database) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Synchronizing database schema");

    match sqlx::migrate!("./migrations").run(db.pool()).await {
        Ok(()) => {
            info!("Database schema is up to date");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Schema synchronization failed");
            Err(e)
        }
    }
}

/// Gets the current migration status
///
/// # Errors
///
/// Returns an error if the migrations table cannot be queried
pub async fn get_migration_status(db: &Database) -> Result<MigrationStatus, sqlx::Error> {
    debug!("Checking migration status");

    let table_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = 'public'
            AND table_name = '_sqlx_migrations'
        )",
    )
    .fetch_one(db.pool())
    .await?;

    if !table_exists {
        debug!("Migrations table does not exist yet");
        return Ok(MigrationStatus {
            applied_migrations: 0,
            latest_version: None,
        });
    }

    let (count, latest_version): (i64, Option<i64>) = sqlx::query_as(
        "SELECT COUNT(*), MAX(version) FROM _sqlx_migrations WHERE success = true",
    )
    .fetch_one(db.pool())
    .await?;

    debug!(
        applied_migrations = count,
        latest_version = ?latest_version,
        "Migration status retrieved"
    );

    Ok(MigrationStatus {
        applied_migrations: count as usize,
        latest_version,
    })
}
