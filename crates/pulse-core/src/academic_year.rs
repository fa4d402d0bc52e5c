//! Validated academic-year newtype.
//!
//! An academic year is written `YYYY-YYYY` where the second year is
//! exactly one greater than the first (e.g. `2023-2024`). Construction
//! is the only way to obtain a value, so any [`AcademicYear`] in the
//! system is known-valid.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A validated academic year such as `2023-2024`.
///
/// Serializes as the plain string; deserialization re-validates, so a
/// malformed value in a payload or a database row is rejected at the
/// boundary rather than propagating inward.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AcademicYear(String);

impl AcademicYear {
    /// Parse and validate an academic year string.
    pub fn new(s: impl Into<String>) -> Result<Self, ValidationError> {
        let s = s.into();
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 9
            && bytes[4] == b'-'
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes[5..].iter().all(u8::is_ascii_digit);
        if !well_formed {
            return Err(ValidationError::AcademicYearFormat(s));
        }
        // Slices are pure ASCII digits at this point.
        let start: u32 = s[..4].parse().map_err(|_| ValidationError::AcademicYearFormat(s.clone()))?;
        let end: u32 = s[5..].parse().map_err(|_| ValidationError::AcademicYearFormat(s.clone()))?;
        if end != start + 1 {
            return Err(ValidationError::AcademicYearSpan(s));
        }
        Ok(Self(s))
    }

    /// The validated string form, e.g. `"2023-2024"`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The starting calendar year.
    pub fn start_year(&self) -> u32 {
        self.0[..4].parse().unwrap_or_default()
    }

    /// The ending calendar year (always `start_year() + 1`).
    pub fn end_year(&self) -> u32 {
        self.0[5..].parse().unwrap_or_default()
    }
}

impl fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AcademicYear {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AcademicYear {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<AcademicYear> for String {
    fn from(year: AcademicYear) -> Self {
        year.0
    }
}
