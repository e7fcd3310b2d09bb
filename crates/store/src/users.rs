//! # User Domain Model
//!
//! The user record, the closed role set, and the storage contract the API
//! server programs against. Password hashes stay off the general read path;
//! handlers that need credential material must ask for it explicitly via
//! [`UserStore::password_hash`].

use chrono::{DateTime, Utc};
use error::Result;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access roles, from least to most privileged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Seller,
    Admin,
}

impl Role {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Seller => "seller",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Postal address attached to a user profile.
///
/// Opaque to the authentication flows; carried through signup and echoed
/// back on reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub country: String,
    pub city:    String,
    pub street:  String,
    pub zip:     String,
}

/// A stored user, as exposed to the rest of the system.
///
/// This is the outward representation: it has no password field by
/// construction, so serializing it can never leak credential material.
/// `password_changed_at` is `None` until the first post-signup password
/// mutation and drives the session freshness check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub address: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_changed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user.
///
/// The confirmation field never reaches this type; request validation
/// checks it before the store is involved, and only the Argon2id hash of
/// `password` is ever persisted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub role: Role,
    pub phone: String,
    pub photo: Option<String>,
    pub address: Address,
}

/// Normalize an email address for storage and lookup.
///
/// Uniqueness and login matching both operate on the normalized form, so
/// `" A@B.com "` and `"a@b.com"` name the same account.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Persistence operations for user accounts.
///
/// Mutations are individually atomic. The reset-token operations are
/// deliberately narrow: they touch only the reset record, never the rest
/// of the user, so a forgot-password request cannot trip over unrelated
/// validation.
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Create a user, hashing the password and enforcing email uniqueness.
    ///
    /// # Errors
    ///
    /// Fails with a 400-class error when the normalized email is already
    /// taken, and a 500-class error when hashing fails.
    async fn create(&self, new_user: NewUser) -> Result<User>;

    /// Look up a user by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Look up a user by email (normalized before matching).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// All users, ordered by creation time.
    async fn list(&self) -> Result<Vec<User>>;

    /// The stored password hash for a user, if the user exists.
    ///
    /// The only way to read credential material out of the store.
    async fn password_hash(&self, id: Uuid) -> Result<Option<String>>;

    /// Replace a user's password.
    ///
    /// Hashes the new password, clears any pending reset token, and bumps
    /// `password_changed_at`, all in one atomic mutation. Returns the
    /// updated user.
    ///
    /// # Errors
    ///
    /// Fails when the user no longer exists or hashing fails.
    async fn set_password(&self, id: Uuid, new_password: &SecretString) -> Result<User>;

    /// Attach a reset-token hash and expiry to a user.
    ///
    /// Overwrites any pending token; only the newest one redeems.
    async fn set_reset_token(&self, id: Uuid, token_hash: &str, expires_at: DateTime<Utc>) -> Result<()>;

    /// Remove a user's pending reset token, if any.
    async fn clear_reset_token(&self, id: Uuid) -> Result<()>;

    /// Find the user holding an unexpired reset token with this hash.
    ///
    /// Wrong hash and expired token are indistinguishable to the caller;
    /// both come back `None`.
    async fn find_by_reset_token(&self, token_hash: &str, now: DateTime<Utc>) -> Result<Option<User>>;
}
