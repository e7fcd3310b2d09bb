//! # CLI Server
//!
//! Server startup and management for the Bazaar CLI.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::anyhow;
use error::Result;
use mailer::{LogMailer, Mailer, SmtpMailer};
use server::{create_app_router, AppState, ServerResult};
use store::MemoryUserStore;
use tokio::net::TcpListener;
use tracing::info;

use crate::config;

/// Starts the API server
///
/// Builds the application state from the environment, binds the listener,
/// and serves until a shutdown signal arrives.
///
/// # Arguments
///
/// * `args` - Serve command arguments
///
/// # Returns
///
/// A `Result` indicating success or failure.
pub async fn serve(args: &crate::commands::ServeArgs) -> Result<()> {
    info!(target: "serve", "Starting API server...");

    // Read session configuration from the environment
    let session = config::session_config_from_env()
        .map_err(|e| anyhow!("Invalid session configuration: {}", e))?;

    // Pick the mailer: SMTP when configured, logging otherwise
    let mail_config = config::mail_config_from_env()
        .map_err(|e| anyhow!("Invalid mail configuration: {}", e))?;
    let mailer: Arc<dyn Mailer> = match mail_config {
        Some(mail_config) => {
            info!(target: "serve", smtp_host = %mail_config.smtp_host, "Using SMTP mailer");
            Arc::new(SmtpMailer::new(&mail_config).map_err(|e| anyhow!("Failed to build SMTP transport: {}", e))?)
        },
        None => {
            tracing::warn!(
                target: "serve",
                "No SMTP configuration found, password reset emails will be logged"
            );
            Arc::new(LogMailer::default())
        },
    };

    // Create application state
    let state = AppState {
        store: Arc::new(MemoryUserStore::new()),
        mailer,
        session,
    };

    // Create the Axum router
    let app = create_app_router(state);

    // Parse the bind address
    let address = config::parse_socket_addr(&args.host, args.port)
        .map_err(|e| anyhow!("Invalid address {}:{}: {}", args.host, args.port, e))?;

    serve_http(&app, &address).await
}

/// Serves the application over HTTP
async fn serve_http(app: &axum::Router, address: &SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| anyhow!("Failed to bind to {}: {}", address, e))?;

    let result = ServerResult::new(&address.to_string());
    info!(
        target: "serve",
        address = %result.address,
        started_at = %result.started_at,
        "Starting HTTP server..."
    );

    Ok(axum::serve(listener, app.clone().into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow!("HTTP server error: {}", e))?)
}

/// Waits for shutdown signals (Ctrl+C or SIGTERM)
#[allow(
    clippy::integer_division_remainder_used,
    reason = "tokio::select! macro triggers false positive"
)]
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install terminate handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
