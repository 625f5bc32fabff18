//! The session authority: password hashing, token issue and validation,
//! and credential authentication.

use std::time::Duration;

use crate::config::{PasswordCost, SigningKey, TokenAlgorithm, TrackerConfig};
use crate::crypto::password;
use crate::error::{Result, TrackerError};
use crate::identity::Identity;
use crate::storage::IdentityStore;

use super::token::{self, BearerToken, Claims, BEARER};

/// Verified against when an email is unknown, so both failure paths cost one
/// Argon2 evaluation.
const DUMMY_PASSWORD: &str = "timing-equalization-placeholder";

/// Issues and checks credentials under one signing key and algorithm.
///
/// Built once from a validated [`TrackerConfig`]; immutable afterwards and
/// safe to share across threads.
#[derive(Debug)]
pub struct SessionAuthority {
    key: SigningKey,
    algorithm: TokenAlgorithm,
    default_ttl: Duration,
    password_cost: PasswordCost,
    dummy_hash: String,
}

impl SessionAuthority {
    /// Build an authority from configuration.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidConfig` if the configuration does not
    /// validate.
    pub fn new(config: &TrackerConfig) -> Result<Self> {
        config.validate()?;
        let dummy_hash = password::hash_password(DUMMY_PASSWORD, config.password_cost)?;
        Ok(Self {
            key: config.signing_key.clone(),
            algorithm: config.token_algorithm,
            default_ttl: config.token_ttl(),
            password_cost: config.password_cost,
            dummy_hash,
        })
    }

    // ── Passwords ─────────────────────────────────────────────────────────────

    /// Hash a password under the configured cost.
    pub fn hash_password(&self, plain: &str) -> Result<String> {
        password::hash_password(plain, self.password_cost)
    }

    /// Check a password against a stored hash. Malformed hashes yield `false`.
    pub fn verify_password(&self, plain: &str, hash: &str) -> bool {
        password::verify_password(plain, hash)
    }

    // ── Tokens ────────────────────────────────────────────────────────────────

    /// Issue a token for `identity`, valid for `ttl` or the configured default.
    pub fn issue_token(&self, identity: &Identity, ttl: Option<Duration>) -> Result<BearerToken> {
        self.issue_token_at(identity, ttl, crate::time::now_secs())
    }

    /// Issue a token as if the current time were `now_secs`.
    pub fn issue_token_at(
        &self,
        identity: &Identity,
        ttl: Option<Duration>,
        now_secs: u64,
    ) -> Result<BearerToken> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let exp = now_secs.saturating_add(ttl.as_secs());
        let claims = Claims {
            sub: identity.email.clone(),
            exp,
        };
        let access_token = token::encode(self.algorithm, self.key.as_bytes(), &claims)?;
        Ok(BearerToken {
            access_token,
            token_type: BEARER.to_string(),
            expires_at: exp,
        })
    }

    /// Validate a token and return the subject email.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidToken` for any malformed, forged, or
    /// expired token.
    pub fn validate_token(&self, token: &str) -> Result<String> {
        self.validate_token_at(token, crate::time::now_secs())
    }

    /// Validate a token as if the current time were `now_secs`.
    pub fn validate_token_at(&self, token: &str, now_secs: u64) -> Result<String> {
        token::decode(self.algorithm, self.key.as_bytes(), token, now_secs).map(|c| c.sub)
    }

    // ── Authentication ────────────────────────────────────────────────────────

    /// Check an email and password against the identity store.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidCredentials` for an unknown email and
    /// for a wrong password alike.
    pub fn authenticate<S>(&self, store: &S, email: &str, password: &str) -> Result<Identity>
    where
        S: IdentityStore + ?Sized,
    {
        match store.get_by_email(email)? {
            Some(identity) => {
                if self.verify_password(password, &identity.password_hash) {
                    Ok(identity)
                } else {
                    log::warn!("authentication failed for {email}");
                    Err(TrackerError::InvalidCredentials)
                }
            }
            None => {
                let _ = self.verify_password(password, &self.dummy_hash);
                log::warn!("authentication failed for {email}");
                Err(TrackerError::InvalidCredentials)
            }
        }
    }

    /// Validate a token and load the identity it names.
    ///
    /// A valid token whose subject no longer exists is treated as invalid.
    pub fn resolve<S>(&self, store: &S, token: &str) -> Result<Identity>
    where
        S: IdentityStore + ?Sized,
    {
        let email = self.validate_token(token)?;
        store.get_by_email(&email)?.ok_or_else(|| {
            log::warn!("token subject is not a registered identity");
            TrackerError::InvalidToken
        })
    }
}
