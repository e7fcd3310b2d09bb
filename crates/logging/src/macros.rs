//! # Logging Macros
//!
//! Convenience macros for structured logging.
//! These macros provide additional metadata and structured fields.

/// Log an authentication event.
///
/// # Example
///
/// ```rust
/// use logging::log_auth_event;
///
/// let user_id = "4f6f...";
/// log_auth_event!("login", user_id, true);
/// ```
#[macro_export]
macro_rules! log_auth_event {
    ($event:expr, $user_id:expr, $success:expr) => {
        tracing::info!(
            target: "auth",
            event = %$event,
            user_id = %$user_id,
            success = $success,
            "Authentication event"
        )
    };
}

/// Log a security event.
#[macro_export]
macro_rules! log_security_event {
    ($event:expr, $subject:expr, $details:expr) => {
        tracing::warn!(
            target: "security",
            event = %$event,
            subject = %$subject,
            details = %$details,
            "Security event"
        )
    };
}
