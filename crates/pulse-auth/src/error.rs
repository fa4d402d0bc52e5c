//! Authentication error taxonomy.
//!
//! Variants deliberately avoid echoing secrets or distinguishing
//! "unknown user" from "wrong password" — callers map most of these to
//! a single 401 response.

use thiserror::Error;

/// Errors from credential handling.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Password does not match, or the account does not exist.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account exists but has been deactivated.
    #[error("account is deactivated")]
    AccountDisabled,

    /// Password shorter than the minimum length.
    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),

    /// The session token failed signature or claim validation.
    #[error("invalid or expired token")]
    TokenInvalid,

    /// The stored password hash could not be parsed or produced.
    #[error("password hash error: {0}")]
    Hash(String),
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(err: argon2::password_hash::Error) -> Self {
        match err {
            argon2::password_hash::Error::Password => Self::InvalidCredentials,
            other => Self::Hash(other.to_string()),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(_: jsonwebtoken::errors::Error) -> Self {
        Self::TokenInvalid
    }
}
