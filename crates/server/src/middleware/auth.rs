//! # Authentication Middleware
//!
//! Session-token gate protecting the authenticated API endpoints.

use auth::{extract_bearer_token, issued_before_password_change, verify_session_token, TokenError};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use error::{AppError, Result};
use store::User;
use uuid::Uuid;

use crate::AppState;

/// The user resolved by the gate, attached to request extensions for
/// downstream handlers.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Authentication gate
///
/// This middleware:
/// 1. Extracts the session token from the Authorization header, falling
///    back to the `jwt` cookie
/// 2. Verifies the token's signature and expiry
/// 3. Resolves the user behind the token and checks that the token was
///    issued after the last password change
/// 4. Adds the resolved user to request extensions
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let token = match token_from_request(&request, &jar) {
        Some(token) => token,
        None => {
            return Err(AppError::unauthorized(
                "You are not logged in. Please log in to get access",
            ));
        },
    };

    let claims = verify_session_token(&state.session, &token).map_err(map_token_error)?;

    // A subject that is not a UUID cannot have been signed by us
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::JwtInvalidToken)?;

    let user = match state.store.find_by_id(user_id).await? {
        Some(user) => user,
        None => {
            return Err(AppError::unauthorized(
                "The user belonging to this token no longer exists",
            ));
        },
    };

    if issued_before_password_change(claims.iat, user.password_changed_at) {
        return Err(AppError::unauthorized(
            "Password was changed recently. Please log in again",
        ));
    }

    // Add user to request extensions
    request.extensions_mut().insert(CurrentUser(user));

    // Continue with the request
    Ok(next.run(request).await)
}

/// Pulls the session token out of the request: `Authorization: Bearer`
/// header preferred, `jwt` cookie as fallback.
fn token_from_request(request: &Request, jar: &CookieJar) -> Option<String> {
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer_token);

    bearer.or_else(|| jar.get("jwt").map(|cookie| cookie.value().to_string()))
}

/// Maps token verification failures onto the error taxonomy
pub(crate) fn map_token_error(err: TokenError) -> AppError {
    match err {
        TokenError::Expired => AppError::JwtExpired,
        TokenError::InvalidSignature => AppError::JwtInvalidSignature,
        TokenError::Invalid => AppError::JwtInvalidToken,
        TokenError::InvalidSecret(message) => {
            AppError::config(format!("Invalid session secret: {message}"))
        },
        TokenError::Signing(message) => {
            AppError::internal(format!("Token signing failed: {message}"))
        },
        TokenError::Clock => AppError::internal("System clock is before the Unix epoch"),
    }
}
