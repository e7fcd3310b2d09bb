//! # Bazaar Mailer
//!
//! Outbound email behind the [`Mailer`] trait: SMTP via lettre in
//! production, a logging fallback for development so the password-reset
//! flow works without a relay.

pub mod smtp;

use lettre::transport::smtp::Error as SmtpError;
use thiserror::Error;

pub use smtp::{MailConfig, SmtpMailer};

/// Subject line for password reset emails.
pub const RESET_SUBJECT: &str = "Your password reset token (valid for 10 min)";

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum MailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Delivery of transactional mail.
///
/// The server holds this as a trait object; tests substitute recording or
/// failing implementations.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a password reset email carrying the reset URL.
    async fn send_password_reset(&self, to: &str, reset_url: &str) -> Result<(), MailError>;
}

/// Body of the password reset email.
#[must_use]
pub fn reset_message(reset_url: &str) -> String {
    format!(
        "Forgot your password? Submit a PATCH request with your new password and \
         passwordConfirm to: {reset_url}.\nIf you didn't forget your password, please \
         ignore this email!"
    )
}

/// Development mailer that logs instead of delivering.
///
/// Keeps the forgot-password flow usable without an SMTP relay; the reset
/// URL lands in the server log.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait::async_trait]
impl Mailer for LogMailer {
    async fn send_password_reset(&self, to: &str, reset_url: &str) -> Result<(), MailError> {
        tracing::info!(
            to = %to,
            reset_url = %reset_url,
            subject = %RESET_SUBJECT,
            "Password reset email (log delivery)"
        );
        Ok(())
    }
}
