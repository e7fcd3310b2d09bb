//! # User Handlers
//!
//! HTTP request handlers for the user endpoints.

use axum::Json;
use error::Result;
use store::User;

use crate::{
    dto::{
        auth::UserEnvelope,
        users::{UserResponse, UsersEnvelope, UsersListResponse},
    },
    AppState,
};

/// Get the authenticated user's own record
///
/// # Arguments
///
/// * `current` - Authenticated user from the gate middleware
///
/// # Returns
///
/// The outward user representation under `data.user`
pub fn me_handler_inner(current: User) -> Json<UserResponse> {
    Json(UserResponse {
        status: "success".to_string(),
        data: UserEnvelope { user: current },
    })
}

/// List all users (admin only)
///
/// # Arguments
///
/// * `state` - Application state
///
/// # Returns
///
/// All users ordered by creation time, with a result count
pub async fn list_users_handler_inner(state: &AppState) -> Result<Json<UsersListResponse>> {
    let users = state.store.list().await?;

    Ok(Json(UsersListResponse {
        status: "success".to_string(),
        results: users.len(),
        data: UsersEnvelope { users },
    }))
}
