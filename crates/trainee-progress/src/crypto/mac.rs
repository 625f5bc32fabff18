//! HMAC-SHA2 signing and verification.
//!
//! Provides a small API for computing and checking message authentication
//! tags under a shared secret with one of the token algorithms.

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

use crate::config::TokenAlgorithm;

/// Compute the authentication tag of `message` under `key`.
pub fn sign(algorithm: TokenAlgorithm, key: &[u8], message: &[u8]) -> Vec<u8> {
    match algorithm {
        TokenAlgorithm::Hs256 => compute::<Hmac<Sha256>>(key, message),
        TokenAlgorithm::Hs384 => compute::<Hmac<Sha384>>(key, message),
        TokenAlgorithm::Hs512 => compute::<Hmac<Sha512>>(key, message),
    }
}

/// Check `tag` against `message` under `key` in constant time.
///
/// Tags of the wrong length are rejected.
pub fn verify(algorithm: TokenAlgorithm, key: &[u8], message: &[u8], tag: &[u8]) -> bool {
    match algorithm {
        TokenAlgorithm::Hs256 => check::<Hmac<Sha256>>(key, message, tag),
        TokenAlgorithm::Hs384 => check::<Hmac<Sha384>>(key, message, tag),
        TokenAlgorithm::Hs512 => check::<Hmac<Sha512>>(key, message, tag),
    }
}

/// Sign and return the tag as unpadded base64url.
pub fn sign_to_base64(algorithm: TokenAlgorithm, key: &[u8], message: &[u8]) -> String {
    base64::Engine::encode(
        &base64::engine::general_purpose::URL_SAFE_NO_PAD,
        sign(algorithm, key, message),
    )
}

/// Verify an unpadded base64url tag. Undecodable input does not verify.
pub fn verify_from_base64(
    algorithm: TokenAlgorithm,
    key: &[u8],
    message: &[u8],
    tag_b64: &str,
) -> bool {
    match base64::Engine::decode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, tag_b64) {
        Ok(tag) => verify(algorithm, key, message, &tag),
        Err(_) => false,
    }
}

fn compute<M: Mac + KeyInit>(key: &[u8], message: &[u8]) -> Vec<u8> {
    // HMAC accepts keys of any length.
    let mut mac = match <M as Mac>::new_from_slice(key) {
        Ok(mac) => mac,
        Err(_) => return Vec::new(),
    };
    mac.update(message);
    mac.finalize().into_bytes().to_vec()
}

fn check<M: Mac + KeyInit>(key: &[u8], message: &[u8], tag: &[u8]) -> bool {
    let mut mac = match <M as Mac>::new_from_slice(key) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(message);
    mac.verify_slice(tag).is_ok()
}
