//! Session token issuance and verification.
//!
//! Session tokens are HS256 JWTs carrying only the user id and the
//! issued-at/expiry timestamps. Nothing is persisted server-side; validity
//! is the signature, the expiry, and the caller's freshness check against
//! the user's last password change.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when issuing or verifying session tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Invalid token")]
    Invalid,

    #[error("Invalid signing secret: {0}")]
    InvalidSecret(String),

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("System clock is before the Unix epoch")]
    Clock,
}

/// Session signing and cookie policy, injected by the caller.
///
/// The secret is the base64 encoding of the HMAC key bytes. Token expiry is
/// carried in the token itself; cookie expiry only bounds how long browsers
/// keep presenting it.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base64-encoded HMAC signing secret
    pub secret: String,
    /// Token lifetime in seconds
    pub expiration_seconds: u64,
    /// Session cookie lifetime in days
    pub cookie_ttl_days: i64,
    /// Set the Secure attribute on session cookies
    pub secure_cookies: bool,
}

/// JWT claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Expiration time (Unix timestamp, seconds)
    pub exp: u64,
    /// Issued at (Unix timestamp, seconds)
    pub iat: u64,
}

/// Issue a signed session token for a user.
///
/// # Arguments
///
/// * `config` - Signing configuration
/// * `user_id` - The authenticated user's id, carried as `sub`
///
/// # Errors
///
/// Fails when the secret is not valid base64 or signing itself fails.
pub fn issue_session_token(config: &SessionConfig, user_id: Uuid) -> Result<String, TokenError> {
    let now = unix_now()?;
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + config.expiration_seconds,
        iat: now,
    };

    let key = EncodingKey::from_base64_secret(&config.secret)
        .map_err(|e| TokenError::InvalidSecret(e.to_string()))?;

    encode(&Header::default(), &claims, &key).map_err(|e| TokenError::Signing(e.to_string()))
}

/// Verify a session token's signature and expiry.
///
/// # Returns
///
/// The decoded claims on success. Expiry and signature failures map to
/// their own variants so callers can report them distinctly; any other
/// malformation is `Invalid`.
pub fn verify_session_token(config: &SessionConfig, token: &str) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_base64_secret(&config.secret)
        .map_err(|e| TokenError::InvalidSecret(e.to_string()))?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Invalid,
            }
        })
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
///
/// Returns `None` when the scheme is not Bearer or the token is empty.
pub fn extract_bearer_token(header_value: &str) -> Option<String> {
    let token = header_value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    }
    else {
        Some(token.to_string())
    }
}

/// True when a token was issued before the user's last password change.
///
/// Both sides compare at whole-second resolution with strict `>`, so a
/// change and an issuance inside the same second leave the token valid.
/// Users who never changed their password have no timestamp and always
/// pass.
#[must_use]
pub fn issued_before_password_change(iat: u64, password_changed_at: Option<DateTime<Utc>>) -> bool {
    match password_changed_at {
        Some(changed_at) => changed_at.timestamp() > iat as i64,
        None => false,
    }
}

fn unix_now() -> Result<u64, TokenError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|_| TokenError::Clock)
}
