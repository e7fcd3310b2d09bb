//! # Bazaar API Server
//!
//! Axum-based HTTP API server for Bazaar user authentication.
//!
//! ## Modules
//!
//! - [`auth`]: Signup, login, and password management endpoints
//! - [`dto`]: Request/response data transfer objects
//! - [`middleware`]: HTTP middleware (session gate, role checks)
//! - [`router`]: API route configuration

use std::sync::Arc;

use ::auth::SessionConfig;
use mailer::Mailer;
use store::UserStore;

pub mod auth;
pub mod dto;
pub mod middleware;
pub mod router;

pub use router::create_app_router;

/// Application state shared across request handlers
#[derive(Clone)]
pub struct AppState {
    /// User persistence backend
    pub store:   Arc<dyn UserStore>,
    /// Outbound mail transport for password resets
    pub mailer:  Arc<dyn Mailer>,
    /// Session token configuration
    pub session: SessionConfig,
}

/// Server initialization result
#[derive(Debug)]
pub struct ServerResult {
    /// The address the server is bound to
    pub address:    String,
    /// Server start timestamp for logging
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl ServerResult {
    /// Creates a new server result
    #[must_use]
    pub fn new(address: &str) -> Self {
        Self {
            address:    address.to_string(),
            started_at: chrono::Utc::now(),
        }
    }
}
