//! # CLI Validate Command
//!
//! Configuration validation for the Bazaar CLI.

use error::{AppError, Result};

use crate::config;

/// Validates the CLI configuration
///
/// Reads the session and mail configuration from the environment and
/// reports what the serve command would use, without binding a socket.
///
/// # Returns
///
/// A `Result` indicating success or failure.
pub fn validate() -> Result<()> {
    let session = config::session_config_from_env()
        .map_err(|e| AppError::config(e.to_string()))?;
    logging::info!(
        target: "app",
        expiration_seconds = session.expiration_seconds,
        cookie_ttl_days = session.cookie_ttl_days,
        secure_cookies = session.secure_cookies,
        "Session configuration is valid"
    );

    match config::mail_config_from_env().map_err(|e| AppError::config(e.to_string()))? {
        Some(mail) => {
            logging::info!(
                target: "app",
                smtp_host = %mail.smtp_host,
                smtp_port = mail.smtp_port,
                "SMTP configuration is valid"
            );
        },
        None => {
            logging::info!(
                target: "app",
                "No SMTP configuration, the logging mailer will be used"
            );
        },
    }

    Ok(())
}
