//! Password reset tokens.
//!
//! Reset tokens are single-use secrets delivered out of band. Only a hash
//! of the token is ever stored, so a leaked store cannot be replayed into
//! a reset; the plaintext exists once, in transit to the user.

use base64::prelude::*;
use chrono::{DateTime, TimeDelta, Utc};

/// How long a reset token stays redeemable.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 10;

/// Generate a new plaintext reset token.
///
/// 32 bytes of OS randomness, base64url without padding. This is the value
/// mailed to the user; store only its hash.
#[must_use]
pub fn generate_reset_token() -> String {
    let bytes = rand::random::<[u8; 32]>();
    BASE64_URL_SAFE_NO_PAD.encode(bytes)
}

/// Hash a plaintext reset token for storage and lookup.
///
/// BLAKE3, hex encoded. Deterministic so the redemption handler can hash
/// the presented token and match it against the stored digest.
#[must_use]
pub fn hash_reset_token(token: &str) -> String {
    blake3::hash(token.as_bytes()).to_hex().to_string()
}

/// Expiry instant for a token issued at `now`.
#[must_use]
pub fn reset_token_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + TimeDelta::minutes(RESET_TOKEN_TTL_MINUTES)
}
