//! # Session Establishment
//!
//! Issues session tokens and shapes them into the standard success
//! response: token in the body, the same token as an HTTP-only cookie.

use auth::issue_session_token;
use axum::{http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use error::Result;
use store::User;

use crate::{
    dto::auth::{AuthSuccessResponse, UserEnvelope},
    middleware::auth::map_token_error,
    AppState,
};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "jwt";

/// Issues a session token for `user` and builds the success response
///
/// The token is returned twice: in the JSON body and as the `jwt` cookie
/// (HTTP-only, Secure when configured, cookie expiry in days from the
/// session configuration). The user in `data.user` is the outward
/// representation, which has no password field by construction.
pub fn establish_session(
    state: &AppState,
    user: User,
    status: StatusCode,
) -> Result<(StatusCode, CookieJar, Json<AuthSuccessResponse>)> {
    let token = issue_session_token(&state.session, user.id).map_err(map_token_error)?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .max_age(time::Duration::days(state.session.cookie_ttl_days))
        .http_only(true)
        .secure(state.session.secure_cookies)
        .same_site(SameSite::Lax)
        .build();

    let body = AuthSuccessResponse {
        status: "success".to_string(),
        token,
        data: UserEnvelope { user },
    };

    Ok((status, CookieJar::new().add(cookie), Json(body)))
}

/// Cookie that overwrites the session cookie on logout
///
/// A dummy value with a ten second max-age, enough to evict the real
/// token from the client without any server-side state.
#[must_use]
pub fn logged_out_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "loggedout"))
        .path("/")
        .max_age(time::Duration::seconds(10))
        .http_only(true)
        .build()
}
