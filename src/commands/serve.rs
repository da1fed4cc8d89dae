//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Settings;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the serve command
pub async fn execute(args: ServeArgs, mut settings: Settings) -> AppResult<()> {
    tracing::info!("Starting server...");

    if let Some(host) = args.host {
        settings.server_host = host;
    }
    if let Some(port) = args.port {
        settings.server_port = port;
    }

    // Initialize database
    let db = Arc::new(Database::connect(&settings.database).await?);

    if settings.debug {
        tracing::warn!("Running in debug mode; never use this in production");
    }

    let addr = settings.server_addr();
    let app_state = AppState::from_settings(settings, Some(db))?;
    tracing::info!(backend = ?app_state.mailer.backend(), "Mail transport ready");

    // Build router
    let app = create_router(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
