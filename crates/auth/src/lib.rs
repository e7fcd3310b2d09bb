//! # Authentication Primitives
//!
//! Credential and session building blocks for the Bazaar API:
//! - Argon2id password hashing and verification
//! - JWT session token issuance and verification
//! - Hashed, short-lived password reset tokens

pub mod password;
pub mod reset;
pub mod token;

// Re-export commonly used types
pub use password::{hash_password, verify_password, PasswordConfig, PasswordError};
pub use reset::{
    generate_reset_token,
    hash_reset_token,
    reset_token_expiry,
    RESET_TOKEN_TTL_MINUTES,
};
pub use token::{
    extract_bearer_token,
    issue_session_token,
    issued_before_password_change,
    verify_session_token,
    Claims,
    SessionConfig,
    TokenError,
};
pub use secrecy;
pub use subtle;
