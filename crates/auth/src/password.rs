//! Password hashing and verification using Argon2id.
//!
//! Passwords are hashed with Argon2id and stored in PHC string format.
//! Verification re-hashes the candidate with the parameters embedded in the
//! stored string and compares in constant time, so a mismatch takes as long
//! as a match.

use argon2::{Algorithm, Argon2, Params, Version};
use base64::prelude::*;
use rand::{rng, RngCore};
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Hashing failed: {0}")]
    HashingFailed(String),

    #[error("Verification failed: password does not match")]
    VerificationFailed,

    #[error("Invalid hash format")]
    InvalidHashFormat,

    #[error("Base64 decoding failed: {0}")]
    DecodingFailed(#[from] base64::DecodeError),
}

/// Configuration for Argon2id password hashing.
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    /// Memory cost in KiB (default: 15 MiB = 15360 KiB)
    pub memory_cost: u32,
    /// Number of iterations (default: 3)
    pub time_cost:   u32,
    /// Number of lanes (default: 2)
    pub parallelism: u32,
    /// Length of the generated hash (default: 32 bytes)
    pub hash_length: u32,
    /// Length of the salt (default: 16 bytes)
    pub salt_length: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_cost: 15360, // 15 MiB
            time_cost:   3,
            parallelism: 2,
            hash_length: 32,
            salt_length: 16,
        }
    }
}

/// Hashes a password using Argon2id.
///
/// # Arguments
///
/// * `password` - The password to hash
/// * `config` - Optional configuration for Argon2id parameters
///
/// # Returns
///
/// The PHC-formatted hash as a `SecretString`, or an error.
///
/// # Example
///
/// ```
/// use auth::password::hash_password;
/// use secrecy::SecretString;
///
/// let password = SecretString::from("secret123".to_string());
/// let hash = hash_password(&password, None).unwrap();
/// ```
pub fn hash_password(password: &SecretString, config: Option<PasswordConfig>) -> Result<SecretString, PasswordError> {
    let config = config.unwrap_or_default();

    // Generate a random salt
    let mut salt = vec![0u8; config.salt_length as usize];
    rng().fill_bytes(&mut salt);

    // Configure Argon2id
    let argon2 = Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(
            config.memory_cost,
            config.time_cost,
            config.parallelism,
            Some(config.hash_length as usize),
        )
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?,
    );

    // Hash the password
    let mut output = vec![0u8; config.hash_length as usize];
    argon2
        .hash_password_into(password.expose_secret().as_bytes(), &salt, &mut output)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    // Format: $argon2id$v=19$m=15360,t=3,p=2$<salt_base64>$<hash_base64>
    let salt_b64 = BASE64_STANDARD.encode(&salt);
    let hash_b64 = BASE64_STANDARD.encode(&output);

    let hash_format = format!(
        "$argon2id$v=19$m={},t={},p={}${}${}",
        config.memory_cost, config.time_cost, config.parallelism, salt_b64, hash_b64
    );

    Ok(SecretString::from(hash_format))
}

/// Verifies a password against a stored hash.
///
/// # Arguments
///
/// * `password` - The password to verify
/// * `expected_hash` - The stored PHC-formatted hash
///
/// # Returns
///
/// `Ok(())` when the password matches, `VerificationFailed` otherwise.
///
/// # Example
///
/// ```
/// use auth::password::{hash_password, verify_password};
/// use secrecy::{ExposeSecret, SecretString};
///
/// let password = SecretString::from("secret123".to_string());
/// let hash = hash_password(&password, None).unwrap();
///
/// assert!(verify_password(&password, hash.expose_secret()).is_ok());
/// ```
pub fn verify_password(password: &SecretString, expected_hash: &str) -> Result<(), PasswordError> {
    let parts = parse_phc(expected_hash)?;

    // Decode salt and stored hash
    let salt = BASE64_STANDARD.decode(parts.salt_b64)?;
    let stored_hash = BASE64_STANDARD.decode(parts.hash_b64)?;

    // Configure Argon2id with the parameters embedded in the stored hash
    let argon2 = Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(
            parts.memory_cost,
            parts.time_cost,
            parts.parallelism,
            Some(stored_hash.len()),
        )
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?,
    );

    // Hash the candidate with the same salt
    let mut computed_hash = vec![0u8; stored_hash.len()];
    argon2
        .hash_password_into(
            password.expose_secret().as_bytes(),
            &salt,
            &mut computed_hash,
        )
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    // Compare using constant-time comparison
    if computed_hash.as_slice().ct_eq(&stored_hash).into() {
        Ok(())
    }
    else {
        Err(PasswordError::VerificationFailed)
    }
}

/// Parsed fields of a PHC-formatted Argon2id hash string.
struct PhcParts<'a> {
    memory_cost: u32,
    time_cost:   u32,
    parallelism: u32,
    salt_b64:    &'a str,
    hash_b64:    &'a str,
}

/// Parse `$argon2id$v=19$m=15360,t=3,p=2$<salt_b64>$<hash_b64>`.
///
/// Splitting by '$' gives: ["", "argon2id", "v=19", "m=...,t=...,p=...",
/// "<salt>", "<hash>"]. Any missing or malformed field is rejected rather
/// than defaulted.
fn parse_phc(expected_hash: &str) -> Result<PhcParts<'_>, PasswordError> {
    let parts: Vec<&str> = expected_hash.split('$').collect();
    if parts.len() != 6 {
        return Err(PasswordError::InvalidHashFormat);
    }

    if parts[1] != "argon2id" {
        return Err(PasswordError::InvalidHashFormat);
    }

    if parts[2] != "v=19" {
        return Err(PasswordError::InvalidHashFormat);
    }

    let mut memory_cost = None;
    let mut time_cost = None;
    let mut parallelism = None;
    for param in parts[3].split(',') {
        match param.split_once('=') {
            Some(("m", value)) => memory_cost = value.parse().ok(),
            Some(("t", value)) => time_cost = value.parse().ok(),
            Some(("p", value)) => parallelism = value.parse().ok(),
            _ => return Err(PasswordError::InvalidHashFormat),
        }
    }

    match (memory_cost, time_cost, parallelism) {
        (Some(memory_cost), Some(time_cost), Some(parallelism)) => {
            Ok(PhcParts {
                memory_cost,
                time_cost,
                parallelism,
                salt_b64: parts[4],
                hash_b64: parts[5],
            })
        },
        _ => Err(PasswordError::InvalidHashFormat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = SecretString::from("secret123".to_string());
        let hash = hash_password(&password, None).unwrap();
        let result = verify_password(&password, hash.expose_secret());
        assert!(result.is_ok(), "Verification failed: {:?}", result);
    }

    #[test]
    fn test_wrong_password_fails() {
        let password = SecretString::from("CorrectPassword".to_string());
        let wrong_password = SecretString::from("WrongPassword".to_string());
        let hash = hash_password(&password, None).unwrap();
        assert!(verify_password(&wrong_password, hash.expose_secret()).is_err());
    }

    #[test]
    fn test_hash_uses_phc_format() {
        let password = SecretString::from("secret123".to_string());
        let hash = hash_password(&password, None).unwrap();
        assert!(hash.expose_secret().starts_with("$argon2id$v=19$m=15360,t=3,p=2$"));
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let password = SecretString::from("secret123".to_string());
        let first = hash_password(&password, None).unwrap();
        let second = hash_password(&password, None).unwrap();
        assert_ne!(
            first.expose_secret(),
            second.expose_secret(),
            "salts must be random"
        );
    }

    #[test]
    fn test_custom_config_round_trips() {
        let config = PasswordConfig {
            memory_cost: 8192,
            time_cost: 2,
            parallelism: 1,
            hash_length: 32,
            salt_length: 16,
        };
        let password = SecretString::from("secret123".to_string());
        let hash = hash_password(&password, Some(config)).unwrap();
        assert!(hash.expose_secret().contains("m=8192,t=2,p=1"));
        assert!(verify_password(&password, hash.expose_secret()).is_ok());
    }

    #[test]
    fn test_malformed_hash_rejected() {
        let password = SecretString::from("secret123".to_string());
        assert!(matches!(
            verify_password(&password, "not-a-phc-string"),
            Err(PasswordError::InvalidHashFormat)
        ));
        assert!(matches!(
            verify_password(&password, "$argon2i$v=19$m=1,t=1,p=1$c2FsdA$aGFzaA"),
            Err(PasswordError::InvalidHashFormat)
        ));
        assert!(matches!(
            verify_password(&password, "$argon2id$v=19$m=1,t=1$c2FsdA$aGFzaA"),
            Err(PasswordError::InvalidHashFormat)
        ));
    }

    #[test]
    fn test_bad_base64_salt_rejected() {
        let password = SecretString::from("secret123".to_string());
        let result = verify_password(&password, "$argon2id$v=19$m=15360,t=3,p=2$!!!$aGFzaA==");
        assert!(matches!(result, Err(PasswordError::DecodingFailed(_))));
    }
}
