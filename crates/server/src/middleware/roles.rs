//! # Role Authorization Middleware
//!
//! Role checks layered behind the authentication gate.

use axum::{extract::Request, middleware::Next, response::Response};
use error::{AppError, Result};
use store::Role;

use crate::middleware::auth::CurrentUser;

/// Restricts a route subtree to the given roles
///
/// Must be layered after [`require_auth`](crate::middleware::auth::require_auth);
/// reads the user that gate attached. A missing attachment means the
/// router wired this check onto an unprotected route.
pub async fn restrict_to(
    allowed: &'static [Role],
    request: Request,
    next: Next,
) -> Result<Response> {
    let role = match request.extensions().get::<CurrentUser>() {
        Some(CurrentUser(user)) => user.role,
        None => {
            return Err(AppError::internal(
                "Role check reached without an authenticated user",
            ));
        },
    };

    if !allowed.contains(&role) {
        return Err(AppError::forbidden(
            "You do not have permission to perform this action",
        ));
    }

    Ok(next.run(request).await)
}
