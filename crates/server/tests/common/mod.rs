//! # Common Test Utilities
//!
//! Shared fixtures for the server integration tests: an in-memory
//! application state, a recording mailer, and request helpers.

use std::sync::{Arc, Once};

use auth::{Claims, PasswordConfig, SessionConfig};
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use mailer::{MailError, Mailer};
use parking_lot::Mutex;
use server::{create_app_router, AppState};
use store::MemoryUserStore;
use uuid::Uuid;

/// Initialize test logging (run once per test session)
static INIT: Once = Once::new();

/// Initialize test environment including structured logging
pub fn init_test_env() {
    INIT.call_once(|| {
        // Initialize tracing subscriber for tests
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// A reset email captured by the recording mailer
#[derive(Debug, Clone)]
pub struct SentMail {
    pub to:        String,
    pub reset_url: String,
}

/// Mailer double that records every send instead of delivering
///
/// With `fail` set it still records, then reports a delivery failure, so
/// tests can observe both the attempted send and the rollback behavior.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<SentMail>>,
    pub fail: bool,
}

impl RecordingMailer {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// A mailer that records the send and then fails delivery
    #[must_use]
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// All mails captured so far
    pub fn sent(&self) -> Vec<SentMail> { self.sent.lock().clone() }
}

#[async_trait::async_trait]
impl Mailer for RecordingMailer {
    async fn send_password_reset(&self, to: &str, reset_url: &str) -> Result<(), MailError> {
        self.sent.lock().push(SentMail {
            to:        to.to_string(),
            reset_url: reset_url.to_string(),
        });

        if self.fail {
            return Err(MailError::InvalidAddress(
                "simulated delivery failure".to_string(),
            ));
        }
        Ok(())
    }
}

/// Session configuration used by every test application
#[must_use]
pub fn test_session_config() -> SessionConfig {
    SessionConfig {
        secret: BASE64.encode(b"test-secret-key-that-is-at-least-32-bytes-long"),
        expiration_seconds: 3600,
        cookie_ttl_days: 90,
        secure_cookies: false,
    }
}

/// Argon2 parameters tuned down so test signups stay fast
#[must_use]
fn cheap_password_config() -> PasswordConfig {
    PasswordConfig {
        memory_cost: 8192,
        time_cost:   1,
        parallelism: 1,
        hash_length: 32,
        salt_length: 16,
    }
}

/// A fully wired application over in-memory collaborators
pub struct TestApp {
    pub router:  Router,
    pub store:   Arc<MemoryUserStore>,
    pub mailer:  Arc<RecordingMailer>,
    pub session: SessionConfig,
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self { Self::with_mailer(RecordingMailer::new()) }

    #[must_use]
    pub fn with_mailer(mailer: RecordingMailer) -> Self {
        Self::with_parts(mailer, test_session_config())
    }

    /// An application whose session configuration differs from the default
    #[must_use]
    pub fn with_session(session: SessionConfig) -> Self {
        Self::with_parts(RecordingMailer::new(), session)
    }

    fn with_parts(mailer: RecordingMailer, session: SessionConfig) -> Self {
        let store = Arc::new(MemoryUserStore::with_config(cheap_password_config()));
        let mailer = Arc::new(mailer);

        let state = AppState {
            store:   store.clone(),
            mailer:  mailer.clone(),
            session: session.clone(),
        };

        Self {
            router: create_app_router(state),
            store,
            mailer,
            session,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self { Self::new() }
}

/// Signup body from the reference example: a minimal valid user
#[must_use]
pub fn signup_body() -> serde_json::Value {
    serde_json::json!({
        "name": "A",
        "email": "a@b.com",
        "password": "secret123",
        "passwordConfirm": "secret123",
        "role": "user",
        "phone": "1",
        "address": {"country": "X", "city": "Y", "street": "Z", "zip": "0"}
    })
}

/// Signup body with a specific email and role
#[must_use]
pub fn signup_body_with(email: &str, role: &str) -> serde_json::Value {
    let mut body = signup_body();
    body["email"] = serde_json::Value::String(email.to_string());
    body["role"] = serde_json::Value::String(role.to_string());
    body
}

/// Builds a JSON request
#[must_use]
pub fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Builds a bodyless GET request
#[must_use]
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Builds a bodyless GET request carrying a Bearer token
#[must_use]
pub fn authed_get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

/// Builds a JSON request carrying a Bearer token
#[must_use]
pub fn authed_json_request(
    method: &str,
    uri: &str,
    token: &str,
    body: &serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Reads a response body as JSON
pub async fn response_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body should be readable");
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

/// Signs a token with the test secret and an arbitrary issue time
///
/// Lets tests place a token's `iat` before a later password change
/// without sleeping across a clock second.
#[must_use]
pub fn token_with_issued_at(session: &SessionConfig, user_id: Uuid, iat: u64) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: iat + session.expiration_seconds,
        iat,
    };
    let key = jsonwebtoken::EncodingKey::from_base64_secret(&session.secret)
        .expect("test secret should be valid base64");
    jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &claims,
        &key,
    )
    .expect("token should encode")
}
