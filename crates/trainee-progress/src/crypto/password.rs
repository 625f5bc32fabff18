//! Password hashing with Argon2id.
//!
//! Hashes are PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`), so
//! the salt and cost travel with the hash and verification never needs them
//! passed separately.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Version};

use crate::config::PasswordCost;
use crate::crypto::random::random_salt_16;
use crate::error::{Result, TrackerError};

/// Hash a password with a fresh random salt under the given cost.
///
/// # Errors
///
/// Returns `TrackerError::InvalidConfig` for unusable cost parameters and
/// `TrackerError::HashingFailed` if Argon2 rejects the input.
pub fn hash_password(plain: &str, cost: PasswordCost) -> Result<String> {
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, cost.to_params()?);

    let salt = SaltString::encode_b64(&random_salt_16())
        .map_err(|e| TrackerError::HashingFailed(format!("salt: {e}")))?;

    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| TrackerError::HashingFailed(format!("argon2: {e}")))?;

    Ok(hash.to_string())
}

/// Check a password against a PHC hash string.
///
/// Algorithm, version, cost, and salt are read from the hash itself. The
/// final tag comparison is constant-time. A hash that does not parse
/// verifies as `false`.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}
