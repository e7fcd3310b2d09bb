//! # In-Memory User Store
//!
//! HashMap-backed [`UserStore`] behind a `parking_lot` lock. Argon2
//! hashing runs outside the lock; each operation takes the lock exactly
//! once, so mutations are individually atomic.

use std::collections::HashMap;

use auth::PasswordConfig;
use chrono::{DateTime, Utc};
use error::{AppError, Result};
use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use uuid::Uuid;

use crate::users::{normalize_email, NewUser, User, UserStore};

/// A pending password-reset window.
#[derive(Debug, Clone)]
struct PendingReset {
    token_hash: String,
    expires_at: DateTime<Utc>,
}

/// Internal record: the public user plus material that must never travel
/// with it.
#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
    reset: Option<PendingReset>,
}

pub struct MemoryUserStore {
    users:    RwLock<HashMap<Uuid, StoredUser>>,
    password: PasswordConfig,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(PasswordConfig::default())
    }

    /// Store with explicit hashing parameters.
    ///
    /// Production uses the defaults; tests pass cheap parameters to keep
    /// suites fast.
    #[must_use]
    pub fn with_config(password: PasswordConfig) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            password,
        }
    }

    fn hash(&self, password: &SecretString) -> Result<String> {
        let hash = auth::hash_password(password, Some(self.password.clone()))
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;
        Ok(hash.expose_secret().to_string())
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, new_user: NewUser) -> Result<User> {
        let email = normalize_email(&new_user.email);
        let password_hash = self.hash(&new_user.password)?;

        let user = User {
            id: Uuid::new_v4(),
            email,
            name: new_user.name,
            role: new_user.role,
            phone: new_user.phone,
            photo: new_user.photo,
            address: new_user.address,
            password_changed_at: None,
            created_at: Utc::now(),
        };

        let mut users = self.users.write();
        if users.values().any(|stored| stored.user.email == user.email) {
            return Err(AppError::bad_request("Email address already in use"));
        }

        let record = StoredUser {
            user: user.clone(),
            password_hash,
            reset: None,
        };
        users.insert(user.id, record);

        debug!(user_id = %user.id, "user created");
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().get(&id).map(|stored| stored.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = normalize_email(email);
        Ok(self
            .users
            .read()
            .values()
            .find(|stored| stored.user.email == email)
            .map(|stored| stored.user.clone()))
    }

    async fn list(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = self
            .users
            .read()
            .values()
            .map(|stored| stored.user.clone())
            .collect();
        users.sort_by_key(|user| (user.created_at, user.id));
        Ok(users)
    }

    async fn password_hash(&self, id: Uuid) -> Result<Option<String>> {
        Ok(self
            .users
            .read()
            .get(&id)
            .map(|stored| stored.password_hash.clone()))
    }

    async fn set_password(&self, id: Uuid, new_password: &SecretString) -> Result<User> {
        let password_hash = self.hash(new_password)?;

        let mut users = self.users.write();
        let stored = users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("User no longer exists"))?;

        stored.password_hash = password_hash;
        stored.reset = None;
        stored.user.password_changed_at = Some(Utc::now());

        debug!(user_id = %id, "password updated");
        Ok(stored.user.clone())
    }

    async fn set_reset_token(&self, id: Uuid, token_hash: &str, expires_at: DateTime<Utc>) -> Result<()> {
        let mut users = self.users.write();
        let stored = users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("User no longer exists"))?;

        stored.reset = Some(PendingReset {
            token_hash: token_hash.to_string(),
            expires_at,
        });

        debug!(user_id = %id, "reset token attached");
        Ok(())
    }

    async fn clear_reset_token(&self, id: Uuid) -> Result<()> {
        // Rollback path: a user deleted mid-flight is already "cleared"
        if let Some(stored) = self.users.write().get_mut(&id) {
            stored.reset = None;
            debug!(user_id = %id, "reset token cleared");
        }
        Ok(())
    }

    async fn find_by_reset_token(&self, token_hash: &str, now: DateTime<Utc>) -> Result<Option<User>> {
        Ok(self.users.read().values().find_map(|stored| {
            let reset = stored.reset.as_ref()?;
            if reset.token_hash == token_hash && reset.expires_at > now {
                Some(stored.user.clone())
            }
            else {
                None
            }
        }))
    }
}
