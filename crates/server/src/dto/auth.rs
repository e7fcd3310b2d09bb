//! # Authentication Data Transfer Objects
//!
//! Request and response types for the authentication endpoints.

use serde::{Deserialize, Serialize};
use store::{Role, User};
use validator::Validate;

/// Request body for user signup
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct SignupRequest {
    /// User's display name
    #[validate(length(min = 1, message = "Please tell us your name"))]
    pub name: String,

    /// User's email address
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    /// User's password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Confirmation that must match `password`
    #[serde(rename = "passwordConfirm")]
    #[validate(must_match(other = "password", message = "Passwords are not the same"))]
    pub password_confirm: String,

    /// Requested role; defaults to `user` when absent
    pub role: Option<Role>,

    /// User's phone number
    #[validate(length(min = 1, message = "Please provide your phone number"))]
    pub phone: String,

    /// Optional profile photo URL
    pub photo: Option<String>,

    /// User's shipping address
    #[validate(nested)]
    pub address: AddressRequest,
}

/// Address block inside a signup request
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct AddressRequest {
    /// Country name
    #[validate(length(min = 1, message = "Please provide your country"))]
    pub country: String,

    /// City name
    #[validate(length(min = 1, message = "Please provide your city"))]
    pub city: String,

    /// Street and house number
    #[validate(length(min = 1, message = "Please provide your street"))]
    pub street: String,

    /// Postal code
    #[validate(length(min = 1, message = "Please provide your zip code"))]
    pub zip: String,
}

impl From<AddressRequest> for store::Address {
    fn from(req: AddressRequest) -> Self {
        Self {
            country: req.country,
            city:    req.city,
            street:  req.street,
            zip:     req.zip,
        }
    }
}

/// Request body for user login
///
/// Both fields default to empty so that a missing key and an empty value
/// take the same rejection path in the handler.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    /// User's email address
    #[serde(default)]
    pub email: String,

    /// User's password
    #[serde(default)]
    pub password: String,
}

/// Request body for the forgot-password endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ForgotPasswordRequest {
    /// Email address of the account to reset
    #[serde(default)]
    pub email: String,
}

/// Request body for the reset-password endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    /// Replacement password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Confirmation that must match `password`
    #[serde(rename = "passwordConfirm")]
    #[validate(must_match(other = "password", message = "Passwords are not the same"))]
    pub password_confirm: String,
}

/// Request body for the update-password endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdatePasswordRequest {
    /// The password the user currently logs in with
    #[serde(rename = "passwordCurrent", default)]
    pub password_current: String,

    /// Replacement password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Confirmation that must match `password`
    #[serde(rename = "passwordConfirm")]
    #[validate(must_match(other = "password", message = "Passwords are not the same"))]
    pub password_confirm: String,
}

/// Envelope holding the outward user representation
#[derive(Debug, Clone, Serialize)]
pub struct UserEnvelope {
    /// The user, serialized without any credential material
    pub user: User,
}

/// Success response for operations that establish a session
#[derive(Debug, Clone, Serialize)]
pub struct AuthSuccessResponse {
    /// Always "success"
    pub status: String,

    /// Signed session token, also set as the `jwt` cookie
    pub token: String,

    /// The authenticated user
    pub data: UserEnvelope,
}

/// Success response for the forgot-password endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForgotPasswordResponse {
    /// Always "success"
    pub status: String,

    /// Human-readable confirmation
    pub message: String,

    /// Plaintext reset token, also delivered by email
    #[serde(rename = "resetToken")]
    pub reset_token: String,
}

/// Generic success response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuccessResponse {
    /// Always "success"
    pub status: String,
}
