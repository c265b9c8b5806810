//! # TaskHub API Server
//!
//! REST API for users and tasks plus a WebSocket relay for realtime task
//! notifications.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskhub-api
//! ```

use anyhow::Context;
use taskhub_api::{
    app::{build_router, AppState},
    config::{Config, LogFormat},
};
use taskhub_shared::db::{
    migrations::{get_migration_status, sync_schema},
    Database,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    init_tracing(config.log_format);

    tracing::info!(
        "TaskHub API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let db = Database::connect(config.database.clone())
        .await
        .context("Unable to connect to the database")?;
    tracing::info!("Database connection established successfully");

    sync_schema(&db)
        .await
        .context("Unable to synchronize the database schema")?;
    let status = get_migration_status(&db).await?;
    tracing::info!(
        applied_migrations = status.applied_migrations,
        latest_version = ?status.latest_version,
        "Database models synchronized"
    );

    let address = config.bind_address();
    let app = build_router(AppState::new(db.clone(), config));

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Unable to bind {}", address))?;
    tracing::info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, closing database pool...");
    db.close().await;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "taskhub_api=debug,taskhub_shared=debug,tower_http=debug".into());

    match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
