//! # Environment Configuration
//!
//! Typed configuration for the CLI, read from `BAZAAR_*` environment
//! variables.

use std::net::SocketAddr;

use auth::SessionConfig;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use mailer::MailConfig;
use secrecy::SecretString;

/// Errors that can occur when reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("Missing required environment variable: {name}")]
    MissingVar {
        /// Name of the missing variable.
        name: &'static str,
    },

    /// A numeric variable could not be parsed.
    #[error("Invalid value for {name}: {value}")]
    InvalidNumber {
        /// Name of the offending variable.
        name:  &'static str,
        /// The value that failed to parse.
        value: String,
    },

    /// The signing secret is not valid base64.
    #[error("BAZAAR_JWT_SECRET is not valid base64")]
    InvalidSecret,
}

/// Reads the session configuration from the environment.
///
/// `BAZAAR_JWT_SECRET` is required and must be base64-encoded. Token and
/// cookie lifetimes fall back to ninety days.
///
/// # Errors
///
/// Returns an error if the secret is missing or malformed, or if a
/// numeric variable fails to parse.
pub fn session_config_from_env() -> Result<SessionConfig, ConfigError> {
    let secret = std::env::var("BAZAAR_JWT_SECRET").map_err(|_| {
        ConfigError::MissingVar {
            name: "BAZAAR_JWT_SECRET",
        }
    })?;
    if BASE64.decode(&secret).is_err() {
        return Err(ConfigError::InvalidSecret);
    }

    Ok(SessionConfig {
        secret,
        expiration_seconds: env_u64("BAZAAR_TOKEN_EXPIRATION_SECONDS", 90 * 24 * 60 * 60)?,
        cookie_ttl_days: env_i64("BAZAAR_COOKIE_TTL_DAYS", 90)?,
        secure_cookies: env_flag("BAZAAR_SECURE_COOKIES"),
    })
}

/// Reads the SMTP configuration from the environment.
///
/// Returns `None` when `BAZAAR_SMTP_HOST` is unset, which selects the
/// logging mailer. A partially configured SMTP block is an error rather
/// than a silent fallback.
///
/// # Errors
///
/// Returns an error if the host is set but username, password, or from
/// address are missing, or if the port fails to parse.
pub fn mail_config_from_env() -> Result<Option<MailConfig>, ConfigError> {
    let smtp_host = match std::env::var("BAZAAR_SMTP_HOST") {
        Ok(host) => host,
        Err(_) => return Ok(None),
    };

    Ok(Some(MailConfig {
        smtp_host,
        smtp_port: env_u16("BAZAAR_SMTP_PORT", 587)?,
        smtp_username: require_var("BAZAAR_SMTP_USERNAME")?,
        smtp_password: SecretString::from(require_var("BAZAAR_SMTP_PASSWORD")?),
        from_address: require_var("BAZAAR_SMTP_FROM")?,
    }))
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| {
        ConfigError::MissingVar {
            name,
        }
    })
}

fn env_u64(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(value) => {
            value.parse().map_err(|_| {
                ConfigError::InvalidNumber {
                    name,
                    value,
                }
            })
        },
        Err(_) => Ok(default),
    }
}

fn env_i64(name: &'static str, default: i64) -> Result<i64, ConfigError> {
    match std::env::var(name) {
        Ok(value) => {
            value.parse().map_err(|_| {
                ConfigError::InvalidNumber {
                    name,
                    value,
                }
            })
        },
        Err(_) => Ok(default),
    }
}

fn env_u16(name: &'static str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(value) => {
            value.parse().map_err(|_| {
                ConfigError::InvalidNumber {
                    name,
                    value,
                }
            })
        },
        Err(_) => Ok(default),
    }
}

fn env_flag(name: &'static str) -> bool {
    std::env::var(name)
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Parses a host and port into a SocketAddr.
///
/// # Arguments
///
/// * `host` - The host string to parse
/// * `port` - The port number
///
/// # Returns
///
/// A `Result` containing the parsed `SocketAddr` or an error if parsing fails.
pub fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, std::net::AddrParseError> {
    // IPv6 addresses must be wrapped in brackets when appending a port
    // e.g., "::1" becomes "[::1]:3000"
    let addr_str = if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    }
    else {
        format!("{}:{}", host, port)
    };
    addr_str.parse()
}
