//! # API Router Configuration
//!
//! Configures API routes for the Bazaar application.

use axum::{
    extract::{Extension, Path, State as AxumState},
    http::{HeaderMap, StatusCode},
    middleware,
    routing::{get, patch, post},
    Json,
    Router,
};
use axum_extra::extract::{CookieJar, WithRejection};
use error::{AppError, Result};
use store::Role;

use crate::{middleware::auth::CurrentUser, AppState};

/// Creates the API router with all routes
///
/// # Arguments
///
/// * `state` - Application state containing the store, mailer, and
///   session configuration
///
/// # Returns
///
/// Configured Axum router with all routes
pub fn create_router(state: AppState) -> Router {
    // Admin-only routes; the role check runs after the gate below
    let admin_routes = Router::new()
        .route("/api/v1/users", get(list_users_handler))
        .route_layer(middleware::from_fn(|request, next| {
            crate::middleware::roles::restrict_to(&[Role::Admin], request, next)
        }));

    // Protected routes that require authentication
    let protected_routes = Router::new()
        .route("/api/v1/users/me", get(me_handler))
        .route("/api/v1/users/update-password", patch(update_password_handler))
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth::require_auth,
        ));

    // Public routes that don't require authentication
    let public_routes = Router::new()
        .route("/api/v1/users/signup", post(signup_handler))
        .route("/api/v1/users/login", post(login_handler))
        .route("/api/v1/users/logout", get(logout_handler))
        .route("/api/v1/users/forgot-password", post(forgot_password_handler))
        .route("/api/v1/users/reset-password/:token", patch(reset_password_handler));

    public_routes.merge(protected_routes).with_state(state)
}

/// Wrapper handler for signup endpoint that uses State extractor
async fn signup_handler(
    AxumState(state): AxumState<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<crate::dto::auth::SignupRequest>, AppError>,
) -> Result<(StatusCode, CookieJar, Json<crate::dto::auth::AuthSuccessResponse>)> {
    crate::auth::handlers::signup_handler_inner(&state, req).await
}

/// Wrapper handler for login endpoint that uses State extractor
async fn login_handler(
    AxumState(state): AxumState<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<crate::dto::auth::LoginRequest>, AppError>,
) -> Result<(StatusCode, CookieJar, Json<crate::dto::auth::AuthSuccessResponse>)> {
    crate::auth::handlers::login_handler_inner(&state, req).await
}

/// Wrapper handler for logout endpoint
async fn logout_handler() -> (CookieJar, Json<crate::dto::auth::SuccessResponse>) {
    crate::auth::handlers::logout_handler_inner().await
}

/// Wrapper handler for forgot-password endpoint that uses State extractor
async fn forgot_password_handler(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    WithRejection(Json(req), _): WithRejection<
        Json<crate::dto::auth::ForgotPasswordRequest>,
        AppError,
    >,
) -> Result<Json<crate::dto::auth::ForgotPasswordResponse>> {
    crate::auth::handlers::forgot_password_handler_inner(&state, headers, req).await
}

/// Wrapper handler for reset-password endpoint that uses State extractor
async fn reset_password_handler(
    AxumState(state): AxumState<AppState>,
    Path(token): Path<String>,
    WithRejection(Json(req), _): WithRejection<
        Json<crate::dto::auth::ResetPasswordRequest>,
        AppError,
    >,
) -> Result<(StatusCode, CookieJar, Json<crate::dto::auth::AuthSuccessResponse>)> {
    crate::auth::handlers::reset_password_handler_inner(&state, token, req).await
}

/// Wrapper handler for update-password endpoint that uses State extractor
async fn update_password_handler(
    AxumState(state): AxumState<AppState>,
    Extension(CurrentUser(current)): Extension<CurrentUser>,
    WithRejection(Json(req), _): WithRejection<
        Json<crate::dto::auth::UpdatePasswordRequest>,
        AppError,
    >,
) -> Result<(StatusCode, CookieJar, Json<crate::dto::auth::AuthSuccessResponse>)> {
    crate::auth::handlers::update_password_handler_inner(&state, current, req).await
}

/// Wrapper handler for the current-user endpoint
async fn me_handler(
    Extension(CurrentUser(current)): Extension<CurrentUser>,
) -> Json<crate::dto::users::UserResponse> {
    crate::auth::users::me_handler_inner(current)
}

/// Wrapper handler for the admin user listing that uses State extractor
async fn list_users_handler(
    AxumState(state): AxumState<AppState>,
) -> Result<Json<crate::dto::users::UsersListResponse>> {
    crate::auth::users::list_users_handler_inner(&state).await
}

/// Creates the health check router
pub fn create_health_router() -> Router { Router::new().route("/health", axum::routing::get(|| async { "OK" })) }

/// Creates the main application router
///
/// # Arguments
///
/// * `state` - Application state containing the store, mailer, and
///   session configuration
///
/// # Returns
///
/// Main router with health checks and API routes
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .merge(create_health_router())
        .merge(create_router(state))
}
