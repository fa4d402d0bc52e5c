//! # Error Hierarchy
//!
//! Structured error types for the Pulse domain, built with `thiserror`.
//! Each variant carries the offending value or state so operators can
//! diagnose a rejected request without guesswork.

use thiserror::Error;

use crate::feedback::FeedbackStatus;

/// Validation errors raised before any state is mutated.
///
/// Every rule here is checked fail-fast at creation and at student edit
/// time — a request that trips one of these never reaches a store.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Feedback content is outside the 10–1000 character range.
    #[error("feedback content must be between 10 and 1000 characters (got {0})")]
    ContentLength(usize),

    /// Rating is outside the 1–5 range.
    #[error("rating must be between 1 and 5 (got {0})")]
    RatingRange(u8),

    /// Semester is outside the 1–8 range.
    #[error("semester must be between 1 and 8 (got {0})")]
    SemesterRange(u8),

    /// Academic year string does not match `YYYY-YYYY`.
    #[error("invalid academic year format: \"{0}\" (expected YYYY-YYYY)")]
    AcademicYearFormat(String),

    /// Academic year end is not start + 1.
    #[error("invalid academic year \"{0}\": end year must be start year + 1")]
    AcademicYearSpan(String),

    /// The subject string is not one of the 20 catalog entries.
    #[error("unknown subject: \"{0}\"")]
    UnknownSubject(String),

    /// A student attempted to submit feedback about themselves.
    #[error("teacher and student cannot be the same user")]
    SelfFeedback,

    /// Teacher response exceeds 500 characters.
    #[error("teacher response cannot exceed 500 characters (got {0})")]
    ResponseLength(usize),
}

/// Errors raised by the feedback lifecycle state machine.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LifecycleError {
    /// A student tried to edit feedback that is no longer pending.
    #[error("only pending feedback can be edited (status is {0})")]
    NotPending(FeedbackStatus),

    /// A student tried to edit feedback past the 7-day window.
    #[error("feedback can only be edited within {window} days of creation (age is {age} days)")]
    EditWindowClosed {
        /// The configured window length in days.
        window: i64,
        /// The record's age in whole days.
        age: i64,
    },

    /// The requested status change is not a valid transition.
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The record's current status.
        from: FeedbackStatus,
        /// The requested target status.
        to: FeedbackStatus,
    },

    /// A validation rule failed during an edit.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_length_display_carries_value() {
        let msg = format!("{}", ValidationError::ContentLength(4));
        assert!(msg.contains("10 and 1000"));
        assert!(msg.contains('4'));
    }

    #[test]
    fn self_feedback_display() {
        let msg = format!("{}", ValidationError::SelfFeedback);
        assert!(msg.contains("same user"));
    }

    #[test]
    fn edit_window_display_carries_age() {
        let err = LifecycleError::EditWindowClosed { window: 7, age: 9 };
        let msg = format!("{err}");
        assert!(msg.contains('7'));
        assert!(msg.contains('9'));
    }

    #[test]
    fn invalid_transition_display_names_both_states() {
        let err = LifecycleError::InvalidTransition {
            from: FeedbackStatus::Archived,
            to: FeedbackStatus::Pending,
        };
        let msg = format!("{err}");
        assert!(msg.contains("archived"));
        assert!(msg.contains("pending"));
    }

    #[test]
    fn validation_error_wraps_transparently() {
        let err = LifecycleError::from(ValidationError::RatingRange(9));
        assert!(format!("{err}").contains("between 1 and 5"));
    }
}
