//! Single-use password-reset tokens.
//!
//! The plaintext token is random, returned to the caller once, and
//! never stored; only its SHA-256 hex digest is persisted on the user
//! record. A reset request is honored by hashing the presented token
//! and comparing digests in constant time.

use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Byte length of the random token before hex encoding.
const TOKEN_BYTES: usize = 32;

/// Generate a fresh reset token.
///
/// Returns `(plaintext, digest)`: the plaintext goes into the reset
/// email, the digest onto the user record.
pub fn mint_reset_token() -> (String, String) {
    let mut raw = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut raw);
    let plaintext = hex_encode(&raw);
    let digest = hash_reset_token(&plaintext);
    (plaintext, digest)
}

/// SHA-256 hex digest of a presented token.
pub fn hash_reset_token(token: &str) -> String {
    hex_encode(&Sha256::digest(token.as_bytes()))
}

/// Constant-time comparison of a presented token against a stored
/// digest.
pub fn reset_token_matches(presented: &str, stored_digest: &str) -> bool {
    let presented_digest = hash_reset_token(presented);
    presented_digest.as_bytes().ct_eq(stored_digest.as_bytes()).into()
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}
