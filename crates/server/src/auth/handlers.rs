//! # Authentication Handlers
//!
//! HTTP request handlers for the authentication endpoints.

use auth::{generate_reset_token, hash_reset_token, reset_token_expiry, verify_password};
use axum::{
    http::{header, HeaderMap, StatusCode},
    Json,
};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use error::{AppError, Result};
use logging::{log_auth_event, log_security_event};
use store::{NewUser, User};
use validator::Validate;

use crate::{
    auth::session::{establish_session, logged_out_cookie},
    dto::auth::{
        AuthSuccessResponse,
        ForgotPasswordRequest,
        ForgotPasswordResponse,
        LoginRequest,
        ResetPasswordRequest,
        SignupRequest,
        SuccessResponse,
        UpdatePasswordRequest,
    },
    AppState,
};

/// Inner handler for signup endpoint
///
/// This function doesn't use State extractor and accepts references to AppState.
/// It's intended to be called by wrapper handlers that use State extractor.
pub async fn signup_handler_inner(
    state: &AppState,
    req: SignupRequest,
) -> Result<(StatusCode, CookieJar, Json<AuthSuccessResponse>)> {
    // Validate before touching storage
    req.validate()?;

    let new_user = NewUser {
        name: req.name,
        email: req.email,
        password: auth::secrecy::SecretString::from(req.password),
        role: req.role.unwrap_or_default(),
        phone: req.phone,
        photo: req.photo,
        address: req.address.into(),
    };

    // The store hashes the password and enforces email uniqueness
    let user = state.store.create(new_user).await?;

    log_auth_event!("signup", user.id, true);
    establish_session(state, user, StatusCode::CREATED)
}

/// Inner handler for login endpoint
///
/// This function doesn't use State extractor and accepts references to AppState.
/// It's intended to be called by wrapper handlers that use State extractor.
pub async fn login_handler_inner(
    state: &AppState,
    req: LoginRequest,
) -> Result<(StatusCode, CookieJar, Json<AuthSuccessResponse>)> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(AppError::bad_request("Please provide email and password"));
    }

    // Find user by email; unknown email and wrong password must be
    // indistinguishable to the caller
    let user = match state.store.find_by_email(&req.email).await? {
        Some(user) => user,
        None => {
            log_security_event!("login_failed", req.email, "unknown email");
            return Err(AppError::unauthorized("Incorrect email or password"));
        },
    };

    // The hash never travels with the user record; fetch it explicitly
    let stored_hash = match state.store.password_hash(user.id).await? {
        Some(hash) => hash,
        None => {
            log_security_event!("login_failed", req.email, "missing credential record");
            return Err(AppError::unauthorized("Incorrect email or password"));
        },
    };

    // Verify password
    let password = auth::secrecy::SecretString::from(req.password);
    if verify_password(&password, &stored_hash).is_err() {
        log_security_event!("login_failed", user.email, "wrong password");
        return Err(AppError::unauthorized("Incorrect email or password"));
    }

    log_auth_event!("login", user.id, true);
    establish_session(state, user, StatusCode::OK)
}

/// Inner handler for logout endpoint
///
/// Overwrites the session cookie with a short-lived dummy value. Tokens
/// already handed out stay cryptographically valid until expiry.
pub async fn logout_handler_inner() -> (CookieJar, Json<SuccessResponse>) {
    let jar = CookieJar::new().add(logged_out_cookie());
    let body = SuccessResponse {
        status: "success".to_string(),
    };
    (jar, Json(body))
}

/// Inner handler for forgot-password endpoint
///
/// This function doesn't use State extractor and accepts references to AppState.
/// It's intended to be called by wrapper handlers that use State extractor.
pub async fn forgot_password_handler_inner(
    state: &AppState,
    headers: HeaderMap,
    req: ForgotPasswordRequest,
) -> Result<Json<ForgotPasswordResponse>> {
    let user = match state.store.find_by_email(&req.email).await? {
        Some(user) => user,
        None => {
            return Err(AppError::not_found("There is no user with that email address"));
        },
    };

    // Store only the hash; the plaintext goes out by email
    let reset_token = generate_reset_token();
    let token_hash = hash_reset_token(&reset_token);
    let expires_at = reset_token_expiry(Utc::now());
    state
        .store
        .set_reset_token(user.id, &token_hash, expires_at)
        .await?;

    let reset_url = reset_url(state, &headers, &reset_token);

    if let Err(err) = state.mailer.send_password_reset(&user.email, &reset_url).await {
        // Roll the token back so a reset nobody received cannot linger
        state.store.clear_reset_token(user.id).await?;
        tracing::error!(error = %err, user_id = %user.id, "Password reset email failed");
        return Err(AppError::dependency(
            "There was an error sending the email. Try again later",
        ));
    }

    log_auth_event!("forgot_password", user.id, true);

    Ok(Json(ForgotPasswordResponse {
        status: "success".to_string(),
        message: "Token sent to email!".to_string(),
        reset_token,
    }))
}

/// Inner handler for reset-password endpoint
///
/// This function doesn't use State extractor and accepts references to AppState.
/// It's intended to be called by wrapper handlers that use State extractor.
pub async fn reset_password_handler_inner(
    state: &AppState,
    token: String,
    req: ResetPasswordRequest,
) -> Result<(StatusCode, CookieJar, Json<AuthSuccessResponse>)> {
    req.validate()?;

    // Wrong token and expired token are indistinguishable here
    let token_hash = hash_reset_token(&token);
    let user = match state.store.find_by_reset_token(&token_hash, Utc::now()).await? {
        Some(user) => user,
        None => {
            return Err(AppError::bad_request("Token is invalid or has expired"));
        },
    };

    // Rotates the hash, clears the reset record, bumps password_changed_at
    let password = auth::secrecy::SecretString::from(req.password);
    let user = state.store.set_password(user.id, &password).await?;

    log_auth_event!("password_reset", user.id, true);
    establish_session(state, user, StatusCode::OK)
}

/// Inner handler for update-password endpoint
///
/// Runs behind the authentication gate; `current` is the user the gate
/// resolved. Success replaces the client's now-stale token.
pub async fn update_password_handler_inner(
    state: &AppState,
    current: User,
    req: UpdatePasswordRequest,
) -> Result<(StatusCode, CookieJar, Json<AuthSuccessResponse>)> {
    req.validate()?;

    let stored_hash = match state.store.password_hash(current.id).await? {
        Some(hash) => hash,
        None => {
            return Err(AppError::unauthorized(
                "The user belonging to this token no longer exists",
            ));
        },
    };

    // Verify the current password before accepting the new one
    let password_current = auth::secrecy::SecretString::from(req.password_current);
    if verify_password(&password_current, &stored_hash).is_err() {
        log_security_event!("password_update_failed", current.email, "wrong current password");
        return Err(AppError::bad_request("Your current password is wrong"));
    }

    let password = auth::secrecy::SecretString::from(req.password);
    let user = state.store.set_password(current.id, &password).await?;

    log_auth_event!("password_update", user.id, true);
    establish_session(state, user, StatusCode::OK)
}

/// Builds the reset URL from the request origin
fn reset_url(state: &AppState, headers: &HeaderMap, token: &str) -> String {
    let scheme = if state.session.secure_cookies { "https" } else { "http" };
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");
    format!("{scheme}://{host}/api/v1/users/reset-password/{token}")
}
