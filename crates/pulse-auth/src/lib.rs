#![deny(missing_docs)]

//! # pulse-auth — Credential Handling
//!
//! Everything that touches a secret lives here:
//!
//! - [`password`] — Argon2id hashing and verification, plus the minimum
//!   length rule.
//! - [`token`] — stateless JWT session tokens (HS256, 30-day expiry).
//! - [`reset`] — single-use password-reset tokens. Only a SHA-256
//!   digest of the token is ever stored; the plaintext goes to the user
//!   once and is never persisted.
//!
//! The API crate composes these; nothing here does I/O.

pub mod error;
pub mod password;
pub mod reset;
pub mod token;

pub use error::AuthError;
pub use password::{hash_password, verify_password, MIN_PASSWORD_LEN};
pub use reset::{hash_reset_token, mint_reset_token, reset_token_matches};
pub use token::{Claims, TokenKeys, TOKEN_TTL_DAYS};
