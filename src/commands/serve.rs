//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use crate::api::middleware::install_recorder;
use crate::api::{create_router, AppState, Server};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::Database(e).context("connect database"))?;
    tracing::info!("Database connected");

    let metrics = if config.metrics_enabled {
        let handle = install_recorder()
            .map_err(|e| AppError::internal(format!("Failed to install metrics recorder: {}", e)))?;
        Some(handle)
    } else {
        None
    };

    let app_state = AppState::from_config(Arc::new(db), &config, metrics);
    let app = create_router(app_state).map_err(|e| AppError::internal(e.to_string()))?;

    let addr = format!("{}:{}", args.host, args.port);
    let server = Server::bind(&addr, app)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?
        .with_grace_period(config.shutdown_timeout);

    server
        .run(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
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
        _ = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
