//! User accounts and the closed role set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The two roles an account can hold.
///
/// The set is closed: there is no admin or superuser role, and the
/// authorization policy matches exhaustively over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Submits and edits feedback about teachers.
    Student,
    /// Reviews, responds to, and triages feedback addressed to them.
    Teacher,
}

impl Role {
    /// Stable string form used in tokens and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
        }
    }

    /// Parse the stable string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "student" => Some(Self::Student),
            "teacher" => Some(Self::Teacher),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered account.
///
/// The password hash and reset-token fields never appear in API
/// responses; the API layer maps this record to a public view before
/// serializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Stable account identifier.
    pub id: Uuid,
    /// Unique login name, 3–30 characters.
    pub username: String,
    /// Unique email address, stored lowercase.
    pub email: String,
    /// Argon2id password hash in PHC string format.
    pub password_hash: String,
    /// The account's role.
    pub role: Role,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Institutional student number. `Some` only for students.
    pub student_id: Option<String>,
    /// Current year of study (1-based). `Some` only for students.
    pub year_of_study: Option<u8>,
    /// Teaching department. `Some` only for teachers.
    pub department: Option<String>,
    /// Deactivated accounts fail authentication with 401.
    pub is_active: bool,
    /// SHA-256 hex digest of the outstanding reset token, if any.
    pub reset_token_hash: Option<String>,
    /// Expiry of the outstanding reset token, if any.
    pub reset_token_expires: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Full display name, `"First Last"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether an unexpired reset token is outstanding at `now`.
    pub fn has_live_reset_token(&self, now: DateTime<Utc>) -> bool {
        match (&self.reset_token_hash, self.reset_token_expires) {
            (Some(_), Some(expires)) => expires > now,
            _ => false,
        }
    }

    /// Clear any outstanding reset token.
    pub fn clear_reset_token(&mut self) {
        self.reset_token_hash = None;
        self.reset_token_expires = None;
    }
}
