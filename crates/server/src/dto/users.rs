//! # User Data Transfer Objects
//!
//! Response types for the user endpoints.

use serde::Serialize;
use store::User;

use crate::dto::auth::UserEnvelope;

/// Response for the current-user endpoint
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    /// Always "success"
    pub status: String,

    /// The requested user
    pub data: UserEnvelope,
}

/// Envelope holding a list of users
#[derive(Debug, Clone, Serialize)]
pub struct UsersEnvelope {
    /// The users, serialized without any credential material
    pub users: Vec<User>,
}

/// Response for the admin user listing
#[derive(Debug, Clone, Serialize)]
pub struct UsersListResponse {
    /// Always "success"
    pub status: String,

    /// Number of users returned
    pub results: usize,

    /// The listed users
    pub data: UsersEnvelope,
}
