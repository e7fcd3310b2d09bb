//! # Authentication Gate Tests
//!
//! Exercises the session gate and role checks through the full router:
//! token extraction, verification failures, user resolution, freshness,
//! and role-based authorization.

mod common;

use auth::secrecy::SecretString;
use axum::http::{header, StatusCode};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use common::{
    authed_get,
    get_request,
    init_test_env,
    json_request,
    response_json,
    signup_body,
    signup_body_with,
    test_session_config,
    token_with_issued_at,
    TestApp,
};
use store::UserStore;
use tower::ServiceExt;
use uuid::Uuid;

/// Signs up a user and returns its id and session token
async fn signup_and_token(app: &TestApp, body: &serde_json::Value) -> (Uuid, String) {
    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/v1/users/signup", body))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    let id = body["data"]["user"]["id"]
        .as_str()
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .expect("signup should return the user id");
    let token = body["token"]
        .as_str()
        .expect("signup should return a token")
        .to_string();
    (id, token)
}

/// The health probe stays outside the gate
#[tokio::test]
async fn test_health_endpoint_is_public() {
    init_test_env();
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(get_request("/health"))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::OK);
}

/// Requests without any credential are rejected
#[tokio::test]
async fn test_protected_route_without_token() {
    init_test_env();
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(get_request("/api/v1/users/me"))
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response_json(response).await;
    assert_eq!(body["status"], "fail");
    assert_eq!(
        body["message"],
        "You are not logged in. Please log in to get access"
    );
}

/// A token that is not a JWT at all is rejected as invalid
#[tokio::test]
async fn test_protected_route_with_garbage_token() {
    init_test_env();
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(authed_get("/api/v1/users/me", "garbage"))
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Invalid token");
}

/// A token signed with a different secret is rejected
#[tokio::test]
async fn test_protected_route_with_foreign_signature() {
    init_test_env();
    let app = TestApp::new();
    let (user_id, _) = signup_and_token(&app, &signup_body()).await;

    let mut foreign = test_session_config();
    foreign.secret = BASE64.encode(b"a-completely-different-signing-secret!!");
    let now = Utc::now().timestamp() as u64;
    let token = token_with_issued_at(&foreign, user_id, now);

    let response = app
        .router
        .clone()
        .oneshot(authed_get("/api/v1/users/me", &token))
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Invalid token signature");
}

/// An expired token is rejected with the dedicated message
#[tokio::test]
async fn test_protected_route_with_expired_token() {
    init_test_env();
    let app = TestApp::new();
    let (user_id, _) = signup_and_token(&app, &signup_body()).await;

    // exp lands an hour in the past, well beyond any verification leeway
    let iat = (Utc::now().timestamp() as u64).saturating_sub(7200);
    let token = token_with_issued_at(&app.session, user_id, iat);

    let response = app
        .router
        .clone()
        .oneshot(authed_get("/api/v1/users/me", &token))
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Token has expired");
}

/// A valid token whose user no longer exists is rejected
#[tokio::test]
async fn test_protected_route_token_for_unknown_user() {
    init_test_env();
    let app = TestApp::new();

    let token = auth::issue_session_token(&app.session, Uuid::new_v4())
        .expect("token should issue");

    let response = app
        .router
        .clone()
        .oneshot(authed_get("/api/v1/users/me", &token))
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response_json(response).await;
    assert_eq!(
        body["message"],
        "The user belonging to this token no longer exists"
    );
}

/// Tokens issued before a password change are rejected afterwards
#[tokio::test]
async fn test_protected_route_stale_token_after_password_change() {
    init_test_env();
    let app = TestApp::new();
    let (user_id, _) = signup_and_token(&app, &signup_body()).await;

    // Issue a token ten minutes in the past, then rotate the password now
    let iat = (Utc::now().timestamp() as u64).saturating_sub(600);
    let stale_token = token_with_issued_at(&app.session, user_id, iat);

    app.store
        .set_password(user_id, &SecretString::from("brand-new-pass"))
        .await
        .expect("password change should succeed");

    let response = app
        .router
        .clone()
        .oneshot(authed_get("/api/v1/users/me", &stale_token))
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response_json(response).await;
    assert_eq!(
        body["message"],
        "Password was changed recently. Please log in again"
    );
}

/// The gate accepts the session cookie when no header is present
#[tokio::test]
async fn test_gate_falls_back_to_session_cookie() {
    init_test_env();
    let app = TestApp::new();
    let (_, token) = signup_and_token(&app, &signup_body()).await;

    let request = axum::http::Request::builder()
        .uri("/api/v1/users/me")
        .header(header::COOKIE, format!("jwt={token}"))
        .body(axum::body::Body::empty())
        .expect("request should build");

    let response = app
        .router
        .clone()
        .oneshot(request)
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["user"]["email"], "a@b.com");
}

/// The Authorization header wins over the cookie
#[tokio::test]
async fn test_gate_prefers_bearer_header_over_cookie() {
    init_test_env();
    let app = TestApp::new();
    let (_, token) = signup_and_token(&app, &signup_body()).await;

    let request = axum::http::Request::builder()
        .uri("/api/v1/users/me")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::COOKIE, "jwt=garbage")
        .body(axum::body::Body::empty())
        .expect("request should build");

    let response = app
        .router
        .clone()
        .oneshot(request)
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), StatusCode::OK);
}

/// The admin listing is gated before it is role-checked
#[tokio::test]
async fn test_user_listing_requires_authentication() {
    init_test_env();
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(get_request("/api/v1/users"))
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Sellers and plain users cannot reach the admin listing
#[tokio::test]
async fn test_user_listing_forbidden_for_non_admins() {
    init_test_env();
    let app = TestApp::new();
    let (_, seller_token) =
        signup_and_token(&app, &signup_body_with("seller@b.com", "seller")).await;
    let (_, user_token) = signup_and_token(&app, &signup_body_with("user@b.com", "user")).await;

    for token in [seller_token, user_token] {
        let response = app
            .router
            .clone()
            .oneshot(authed_get("/api/v1/users", &token))
            .await
            .expect("request should succeed");

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = response_json(response).await;
        assert_eq!(
            body["message"],
            "You do not have permission to perform this action"
        );
    }
}

/// Admins can list every user
#[tokio::test]
async fn test_user_listing_allows_admin() {
    init_test_env();
    let app = TestApp::new();
    signup_and_token(&app, &signup_body_with("user@b.com", "user")).await;
    let (_, admin_token) =
        signup_and_token(&app, &signup_body_with("admin@b.com", "admin")).await;

    let response = app
        .router
        .clone()
        .oneshot(authed_get("/api/v1/users", &admin_token))
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["results"], 2);
    assert_eq!(body["data"]["users"].as_array().map(Vec::len), Some(2));
}
