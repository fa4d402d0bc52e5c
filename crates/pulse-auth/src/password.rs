//! Argon2id password hashing.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::AuthError;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Hash a plaintext password with Argon2id and a fresh random salt.
///
/// Returns the PHC string (`$argon2id$...`), which embeds the salt and
/// parameters, so verification needs no side-channel configuration.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::PasswordTooShort(MIN_PASSWORD_LEN));
    }
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash.
///
/// A mismatch is `Err(AuthError::InvalidCredentials)`; a malformed
/// stored hash is `Err(AuthError::Hash(_))`.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(stored_hash)?;
    Argon2::default().verify_password(password.as_bytes(), &parsed)?;
    Ok(())
}
