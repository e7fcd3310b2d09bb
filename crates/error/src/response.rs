//! # API Response Types
//!
//! Generic API response envelope for the Bazaar application.
//! Provides a consistent response format for all API endpoints.
//!
//! ## Response Format
//!
//! ```json
//! { "status": "success", "data": { ... } }
//! { "status": "fail",    "message": "..." }
//! { "status": "error",   "message": "..." }
//! ```
//!
//! Client errors (4xx) report `fail`, server errors (5xx) report `error`.

use serde::{Deserialize, Serialize};

use crate::AppError;

/// API response envelope.
///
/// # Example
///
/// ```rust
/// use error::ApiResponse;
///
/// let response = ApiResponse::ok(vec!["item1", "item2"]);
/// let json = serde_json::to_string(&response).unwrap();
/// assert!(json.contains("\"status\":\"success\""));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum ApiResponse<T> {
    /// Success response.
    Success {
        /// Response data.
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<T>,
    },

    /// Client error response (4xx).
    Fail {
        /// Error message.
        message: String,
    },

    /// Server error response (5xx).
    Error {
        /// Error message.
        message: String,
    },
}

impl<T> ApiResponse<T> {
    /// Create a success response with data.
    #[inline]
    pub fn ok(data: T) -> Self {
        ApiResponse::Success {
            data: Some(data),
        }
    }

    /// Create a success response with no data.
    #[inline]
    pub fn empty() -> Self {
        ApiResponse::Success {
            data: None,
        }
    }

    /// Create a client error response.
    #[inline]
    pub fn fail(message: impl ToString) -> Self {
        ApiResponse::Fail {
            message: message.to_string(),
        }
    }

    /// Create a server error response.
    #[inline]
    pub fn error(message: impl ToString) -> Self {
        ApiResponse::Error {
            message: message.to_string(),
        }
    }

    /// Get a reference to the data if this is a success response.
    #[inline]
    pub fn data(&self) -> Option<&T> {
        match self {
            ApiResponse::Success {
                data,
            } => data.as_ref(),
            _ => None,
        }
    }

    /// Get the message if this is a fail or error response.
    #[inline]
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiResponse::Success {
                ..
            } => None,
            ApiResponse::Fail {
                message,
            } => Some(message),
            ApiResponse::Error {
                message,
            } => Some(message),
        }
    }

    /// Check if this is a success response.
    #[inline]
    pub fn is_success(&self) -> bool { matches!(self, ApiResponse::Success { .. }) }

    /// Check if this is a client error response.
    #[inline]
    pub fn is_fail(&self) -> bool { matches!(self, ApiResponse::Fail { .. }) }

    /// Check if this is a server error response.
    #[inline]
    pub fn is_error(&self) -> bool { matches!(self, ApiResponse::Error { .. }) }
}

impl<T> From<&AppError> for ApiResponse<T> {
    fn from(err: &AppError) -> Self {
        if !err.is_operational() {
            return Self::error("Something went very wrong");
        }
        if err.status().is_client_error() {
            Self::fail(err.message())
        }
        else {
            Self::error(err.message())
        }
    }
}

/// Render an [`AppError`] as an HTTP response.
///
/// Operational errors surface their message in the envelope. Anything else
/// is logged with full detail and surfaced with a generic message so
/// internals never leak to clients.
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        if self.is_operational() {
            tracing::debug!(code = self.code(), message = %self.message(), "request failed");
        }
        else {
            tracing::error!(code = self.code(), error = %self, "unexpected internal error");
        }

        let body: ApiResponse<()> = ApiResponse::from(&self);
        (self.status(), axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;
    use http::StatusCode;

    use super::*;

    #[test]
    fn test_response_ok() {
        let response = ApiResponse::ok("test data");
        match response {
            ApiResponse::Success {
                data,
            } => {
                assert_eq!(data, Some("test data"));
            },
            _ => panic!("Expected success response"),
        }
    }

    #[test]
    fn test_response_fail() {
        let response: ApiResponse<()> = ApiResponse::fail("Incorrect email or password");
        match response {
            ApiResponse::Fail {
                message,
            } => {
                assert_eq!(message, "Incorrect email or password");
            },
            _ => panic!("Expected fail response"),
        }
    }

    #[test]
    fn test_response_error() {
        let response: ApiResponse<()> = ApiResponse::error("Something went very wrong");
        match response {
            ApiResponse::Error {
                message,
            } => {
                assert_eq!(message, "Something went very wrong");
            },
            _ => panic!("Expected error response"),
        }
    }

    #[test]
    fn test_response_serialization() {
        let response = ApiResponse::ok("test");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"success\""));
        assert!(json.contains("\"data\":\"test\""));
    }

    #[test]
    fn test_empty_serialization_omits_data() {
        let response: ApiResponse<()> = ApiResponse::empty();
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, "{\"status\":\"success\"}");
    }

    #[test]
    fn test_fail_serialization() {
        let response: ApiResponse<()> = ApiResponse::fail("Token is invalid or has expired");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"fail\""));
        assert!(json.contains("\"message\":\"Token is invalid or has expired\""));
    }

    #[test]
    fn test_error_serialization() {
        let response: ApiResponse<()> = ApiResponse::error("Something went very wrong");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"error\""));
        assert!(json.contains("\"message\":\"Something went very wrong\""));
    }

    #[test]
    fn test_deserialization_round_trip() {
        let json = "{\"status\":\"success\",\"data\":[1,2,3]}";
        let response: ApiResponse<Vec<i32>> = serde_json::from_str(json).unwrap();
        assert!(response.is_success());
        assert_eq!(response.data(), Some(&vec![1, 2, 3]));
    }

    #[test]
    fn test_accessors() {
        let ok = ApiResponse::ok(42);
        assert!(ok.is_success());
        assert!(!ok.is_fail());
        assert_eq!(ok.data(), Some(&42));
        assert_eq!(ok.message(), None);

        let fail: ApiResponse<i32> = ApiResponse::fail("nope");
        assert!(fail.is_fail());
        assert_eq!(fail.data(), None);
        assert_eq!(fail.message(), Some("nope"));

        let error: ApiResponse<i32> = ApiResponse::error("boom");
        assert!(error.is_error());
        assert_eq!(error.message(), Some("boom"));
    }

    // AppError Conversion Tests
    #[test]
    fn test_client_error_becomes_fail() {
        let envelope: ApiResponse<()> = ApiResponse::from(&AppError::unauthorized("no token"));
        assert!(envelope.is_fail());
        assert_eq!(envelope.message(), Some("no token"));
    }

    #[test]
    fn test_dependency_error_becomes_error_with_message() {
        let err = AppError::dependency("There was an error sending the email. Try again later");
        let envelope: ApiResponse<()> = ApiResponse::from(&err);
        assert!(envelope.is_error());
        assert_eq!(
            envelope.message(),
            Some("There was an error sending the email. Try again later")
        );
    }

    #[test]
    fn test_internal_error_is_masked() {
        let err = AppError::internal("secret connection string leaked");
        let envelope: ApiResponse<()> = ApiResponse::from(&err);
        assert!(envelope.is_error());
        assert_eq!(envelope.message(), Some("Something went very wrong"));
    }

    // IntoResponse Tests
    #[tokio::test]
    async fn test_into_response_status_and_body() {
        let response = AppError::not_found("There is no user with that email address").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ApiResponse<()> = serde_json::from_slice(&bytes).unwrap();
        assert!(body.is_fail());
        assert_eq!(
            body.message(),
            Some("There is no user with that email address")
        );
    }

    #[tokio::test]
    async fn test_into_response_masks_internal_details() {
        let response = AppError::internal("db password is hunter2").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!text.contains("hunter2"));
        assert!(text.contains("\"status\":\"error\""));
    }

    #[tokio::test]
    async fn test_into_response_jwt_expired() {
        let response = AppError::JwtExpired.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ApiResponse<()> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.message(), Some("Token has expired"));
    }
}
