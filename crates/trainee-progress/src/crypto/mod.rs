//! Cryptographic primitives for trainee-progress.
//!
//! This module provides:
//! - Argon2id password hashing in PHC string format
//! - HMAC-SHA2 message authentication for bearer tokens
//! - Cryptographically secure random number generation

pub mod mac;
pub mod password;
pub mod random;
