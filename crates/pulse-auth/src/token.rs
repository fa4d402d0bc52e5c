//! Stateless JWT session tokens.
//!
//! Tokens are HS256-signed with the server secret and carry the account
//! id and role. Expiry is checked by the library during decoding, so a
//! stale token surfaces as [`AuthError::TokenInvalid`].

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pulse_core::Role;

use crate::error::AuthError;

/// Session token lifetime.
pub const TOKEN_TTL_DAYS: i64 = 30;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id.
    pub sub: Uuid,
    /// Account role at issue time.
    pub role: Role,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// Paired signing and verification keys derived from one secret.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    /// Derive both keys from the configured secret.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a token for an account, valid for [`TOKEN_TTL_DAYS`].
    pub fn issue(&self, account_id: Uuid, role: Role, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = Claims {
            sub: account_id,
            role,
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Verify a token's signature and expiry, returning its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims)
    }
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material stays out of logs.
        f.debug_struct("TokenKeys").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> TokenKeys {
        TokenKeys::new(b"unit-test-secret-not-for-production")
    }

    #[test]
    fn issue_then_verify_round_trips_claims() {
        let keys = keys();
        let id = Uuid::new_v4();
        let now = Utc::now();
        let token = keys.issue(id, Role::Teacher, now).unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, Role::Teacher);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_DAYS * 86_400);
    }

    #[test]
    fn token_signed_with_other_secret_rejected() {
        let token = keys().issue(Uuid::new_v4(), Role::Student, Utc::now()).unwrap();
        let other = TokenKeys::new(b"a completely different secret");
        assert!(matches!(other.verify(&token), Err(AuthError::TokenInvalid)));
    }

    #[test]
    fn expired_token_rejected() {
        let keys = keys();
        let issued = Utc::now() - Duration::days(TOKEN_TTL_DAYS + 1);
        let token = keys.issue(Uuid::new_v4(), Role::Student, issued).unwrap();
        assert!(matches!(keys.verify(&token), Err(AuthError::TokenInvalid)));
    }

    #[test]
    fn tampered_token_rejected() {
        let keys = keys();
        let mut token = keys.issue(Uuid::new_v4(), Role::Student, Utc::now()).unwrap();
        token.push('x');
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn debug_redacts_key_material() {
        let rendered = format!("{:?}", keys());
        assert!(!rendered.contains("secret"));
    }
}
