//! Bearer tokens in compact JWS form: `header.payload.signature`.
//!
//! Each segment is unpadded base64url. The header is
//! `{"alg":"HS256","typ":"JWT"}`, the payload carries the subject email and
//! an absolute expiry in whole seconds. The signature is an HMAC over the
//! ASCII text `header.payload`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::config::TokenAlgorithm;
use crate::crypto::mac;
use crate::error::{Result, TrackerError};

const TOKEN_TYPE: &str = "JWT";

/// Token type reported alongside an issued token.
pub const BEARER: &str = "bearer";

// ── Wire structures ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// The signed assertion carried by a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Email of the identity the token was issued to.
    pub sub: String,
    /// Expiry (seconds since epoch). The token is valid while `now < exp`.
    pub exp: u64,
}

/// A freshly issued token, as handed to the client.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BearerToken {
    pub access_token: String,
    pub token_type: String,
    /// Expiry (seconds since epoch).
    pub expires_at: u64,
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

// ── Encode / decode ───────────────────────────────────────────────────────────

fn encode_segment<T: Serialize>(value: &T) -> Result<String> {
    let json =
        serde_json::to_vec(value).map_err(|e| TrackerError::SerializationError(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn decode_segment<T: for<'de> Deserialize<'de>>(segment: &str) -> Result<T> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TrackerError::InvalidToken)?;
    serde_json::from_slice(&bytes).map_err(|_| TrackerError::InvalidToken)
}

/// Sign `claims` into a compact token string.
pub fn encode(algorithm: TokenAlgorithm, key: &[u8], claims: &Claims) -> Result<String> {
    let header = Header {
        alg: algorithm.as_str().to_string(),
        typ: TOKEN_TYPE.to_string(),
    };
    let signing_input = format!("{}.{}", encode_segment(&header)?, encode_segment(claims)?);
    let signature = mac::sign_to_base64(algorithm, key, signing_input.as_bytes());
    Ok(format!("{signing_input}.{signature}"))
}

/// Verify a compact token and return its claims.
///
/// Every failure (shape, signature, header, payload, expiry) maps to
/// `TrackerError::InvalidToken`.
pub fn decode(algorithm: TokenAlgorithm, key: &[u8], token: &str, now_secs: u64) -> Result<Claims> {
    let mut segments = token.split('.');
    let (header_b64, payload_b64, signature_b64) =
        match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(h), Some(p), Some(s), None) => (h, p, s),
            _ => return Err(TrackerError::InvalidToken),
        };

    // The signature covers the exact bytes received, so check it before
    // trusting anything inside.
    let signing_input_len = header_b64.len() + 1 + payload_b64.len();
    let signing_input = &token[..signing_input_len];
    if !mac::verify_from_base64(algorithm, key, signing_input.as_bytes(), signature_b64) {
        return Err(TrackerError::InvalidToken);
    }

    let header: Header = decode_segment(header_b64)?;
    if header.alg != algorithm.as_str() || header.typ != TOKEN_TYPE {
        return Err(TrackerError::InvalidToken);
    }

    let claims: Claims = decode_segment(payload_b64)?;
    if now_secs >= claims.exp {
        return Err(TrackerError::InvalidToken);
    }
    Ok(claims)
}
