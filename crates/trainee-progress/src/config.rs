//! Process-wide tracker configuration.
//!
//! A [`TrackerConfig`] is built once at startup (from defaults, a TOML file,
//! and the `TRAINEE_PROGRESS_SIGNING_KEY` environment variable), validated,
//! and then passed by reference into every component. Nothing in the crate
//! reads configuration from global state.
//!
//! Example TOML:
//! ```toml
//! signing_key = "a-long-random-secret-of-at-least-32-bytes"
//! token_algorithm = "HS256"
//! token_ttl_days = 30
//! curriculum = ["Briefing Room", "Debrief"]
//! disclosure = "conceal"
//!
//! [score_bounds]
//! min = 0
//! max = 10
//!
//! [password_cost]
//! memory_kib = 19456
//! iterations = 2
//! parallelism = 1
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::curriculum::Curriculum;
use crate::error::{Result, TrackerError};
use crate::mediator::DisclosurePolicy;

/// Environment variable that overrides the configured signing key.
pub const SIGNING_KEY_ENV: &str = "TRAINEE_PROGRESS_SIGNING_KEY";

/// Minimum signing key length in bytes.
pub const MIN_SIGNING_KEY_LEN: usize = 32;

const DEFAULT_TOKEN_TTL_DAYS: u64 = 30;

/// Longest accepted token lifetime, in days.
pub const MAX_TOKEN_TTL_DAYS: u64 = 36_500;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Symmetric secret used to sign bearer tokens.
///
/// Zeroized on drop; never printed by `Debug`.
#[derive(Clone, Default, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct SigningKey(String);

impl SigningKey {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// A fresh random key: 32 bytes from the OS source, hex encoded.
    pub fn generate() -> Self {
        Self(hex::encode(crate::crypto::random::random_bytes::<32>()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// HMAC algorithm used to sign tokens. Fixed for the life of the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenAlgorithm {
    #[default]
    #[serde(rename = "HS256")]
    Hs256,
    #[serde(rename = "HS384")]
    Hs384,
    #[serde(rename = "HS512")]
    Hs512,
}

impl TokenAlgorithm {
    /// Name written into the token header.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hs256 => "HS256",
            Self::Hs384 => "HS384",
            Self::Hs512 => "HS512",
        }
    }
}

impl std::fmt::Display for TokenAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive bounds for an attempted chapter's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBounds {
    pub min: u8,
    pub max: u8,
}

impl Default for ScoreBounds {
    fn default() -> Self {
        Self { min: 0, max: 10 }
    }
}

impl ScoreBounds {
    pub fn contains(&self, score: i64) -> bool {
        score >= i64::from(self.min) && score <= i64::from(self.max)
    }
}

/// Argon2id cost parameters for password hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordCost {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism (lanes).
    pub parallelism: u32,
}

impl Default for PasswordCost {
    fn default() -> Self {
        // 19 MiB, 2 passes, 1 lane
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl PasswordCost {
    /// The cheapest parameters Argon2 accepts. Only for tests and benches.
    pub fn minimal() -> Self {
        Self {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        }
    }

    pub(crate) fn to_params(self) -> Result<argon2::Params> {
        argon2::Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| TrackerError::InvalidConfig(format!("password_cost: {e}")))
    }
}

/// The immutable configuration value handed to every component.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub signing_key: SigningKey,
    pub token_algorithm: TokenAlgorithm,
    pub token_ttl_days: u64,
    pub curriculum: Curriculum,
    pub disclosure: DisclosurePolicy,
    pub score_bounds: ScoreBounds,
    pub password_cost: PasswordCost,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            signing_key: SigningKey::default(),
            token_algorithm: TokenAlgorithm::default(),
            token_ttl_days: DEFAULT_TOKEN_TTL_DAYS,
            curriculum: Curriculum::default(),
            disclosure: DisclosurePolicy::default(),
            score_bounds: ScoreBounds::default(),
            password_cost: PasswordCost::default(),
        }
    }
}

impl TrackerConfig {
    /// Default configuration with the given signing key.
    pub fn with_signing_key(secret: impl Into<String>) -> Self {
        Self {
            signing_key: SigningKey::new(secret),
            ..Self::default()
        }
    }

    /// Parse a TOML document, apply the environment override, and validate.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(source)
            .map_err(|e| TrackerError::InvalidConfig(format!("TOML: {e}")))?;
        config.apply_env_override();
        config.validate()?;
        Ok(config)
    }

    /// Render as a TOML document that [`from_toml_str`](Self::from_toml_str)
    /// reads back.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| TrackerError::SerializationError(e.to_string()))
    }

    /// Load a TOML file, apply the environment override, and validate.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Io` if the file cannot be read and
    /// `TrackerError::InvalidConfig` if it does not parse or validate.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Defaults plus the environment override, validated. Used when no
    /// configuration file exists.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_override();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_override(&mut self) {
        if let Ok(secret) = std::env::var(SIGNING_KEY_ENV) {
            if !secret.is_empty() {
                self.signing_key = SigningKey::new(secret);
            }
        }
    }

    /// Check every field for a usable value.
    pub fn validate(&self) -> Result<()> {
        if self.signing_key.len() < MIN_SIGNING_KEY_LEN {
            return Err(TrackerError::InvalidConfig(format!(
                "signing_key must be at least {MIN_SIGNING_KEY_LEN} bytes (set {SIGNING_KEY_ENV})"
            )));
        }
        if self.token_ttl_days == 0 || self.token_ttl_days > MAX_TOKEN_TTL_DAYS {
            return Err(TrackerError::InvalidConfig(format!(
                "token_ttl_days must be between 1 and {MAX_TOKEN_TTL_DAYS}, got {}",
                self.token_ttl_days
            )));
        }
        if self.score_bounds.min > self.score_bounds.max {
            return Err(TrackerError::InvalidConfig(format!(
                "score_bounds min {} exceeds max {}",
                self.score_bounds.min, self.score_bounds.max
            )));
        }
        self.password_cost.to_params()?;
        Ok(())
    }

    /// Default token lifetime.
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_days.saturating_mul(SECS_PER_DAY))
    }
}
