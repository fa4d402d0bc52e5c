//! Time ranges and concrete windows.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The three selectable analytics ranges.
///
/// Month is the canonical default: an absent or unrecognized range
/// parameter falls back to it rather than erroring, so dashboard links
/// with stale query strings keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// Trailing 7 days.
    Week,
    /// Trailing 30 days.
    Month,
    /// Trailing 365 days.
    Year,
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::Month
    }
}

impl TimeRange {
    /// Length of the range in days.
    pub fn days(&self) -> i64 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Year => 365,
        }
    }

    /// Lenient parse: `"week"`, `"month"`, `"year"` (case-insensitive);
    /// anything else is the default.
    pub fn parse_lenient(s: Option<&str>) -> Self {
        match s.map(str::to_ascii_lowercase).as_deref() {
            Some("week") => Self::Week,
            Some("year") => Self::Year,
            _ => Self::Month,
        }
    }

    /// The concrete window ending at `end` (typically "now").
    pub fn window_ending(&self, end: DateTime<Utc>) -> Window {
        Window { start: end - Duration::days(self.days()), end }
    }
}

/// A half-open time window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Inclusive lower bound.
    pub start: DateTime<Utc>,
    /// Exclusive upper bound.
    pub end: DateTime<Utc>,
}

impl Window {
    /// Whether `t` falls inside the window.
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }

    /// The equally sized window immediately before this one.
    ///
    /// Used for growth figures: current window vs the one preceding it.
    pub fn preceding(&self) -> Window {
        let span = self.end - self.start;
        Window { start: self.start - span, end: self.start }
    }
}
