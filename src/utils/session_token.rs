//! Session token generation and hashing.
//!
//! Raw tokens are handed to the client once; only their HMAC-SHA256 digest
//! (keyed by `SESSION_SIGNING_SECRET`) is stored.

use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Random bytes per token before base64 encoding.
const TOKEN_BYTES: usize = 32;

/// Generates a cryptographically secure session token.
///
/// 32 random bytes from `getrandom`, URL-safe base64 without padding
/// (43 characters).
///
/// # Panics
///
/// Panics if the system random number generator fails.
pub fn generate_session_token() -> String {
    let mut buffer = [0u8; TOKEN_BYTES];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer)
}

/// Hashes a raw token for storage and lookup.
///
/// Returns a 64-character lowercase hex-encoded MAC.
pub fn hash_session_token(signing_secret: &str, token: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
