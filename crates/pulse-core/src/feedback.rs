//! Feedback records and their status machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::academic_year::AcademicYear;
use crate::subject::Subject;

/// Lifecycle status of a feedback record.
///
/// Valid transitions:
///
/// ```text
/// pending ──► reviewed ──► archived
///    └────────────────────────┘
/// ```
///
/// A record never leaves `archived`, and a same-status update is a
/// permitted no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackStatus {
    /// Newly submitted, not yet looked at by the teacher.
    Pending,
    /// The teacher has reviewed the feedback.
    Reviewed,
    /// Closed out; terminal.
    Archived,
}

impl FeedbackStatus {
    /// Stable lowercase string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Archived => "archived",
        }
    }

    /// Whether a transition from `self` to `target` is allowed.
    pub fn can_transition_to(&self, target: FeedbackStatus) -> bool {
        if *self == target {
            return true;
        }
        match (self, target) {
            (Self::Pending, Self::Reviewed) => true,
            (Self::Pending, Self::Archived) => true,
            (Self::Reviewed, Self::Archived) => true,
            _ => false,
        }
    }

    /// `archived` accepts no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Archived)
    }
}

impl std::fmt::Display for FeedbackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A feedback record linking one student's rating of one teacher for a
/// subject in a given semester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    /// Stable record identifier.
    pub id: Uuid,
    /// The student who submitted the feedback.
    pub student_id: Uuid,
    /// The teacher the feedback is about.
    pub teacher_id: Uuid,
    /// Subject from the fixed catalog.
    pub subject: Subject,
    /// Free-text body, 10–1000 characters.
    pub content: String,
    /// Star rating, 1–5.
    pub rating: u8,
    /// Semester of study, 1–8.
    pub semester: u8,
    /// Academic year the feedback refers to.
    pub academic_year: AcademicYear,
    /// When true, the student's identity is withheld from responses.
    pub is_anonymous: bool,
    /// Current lifecycle status.
    pub status: FeedbackStatus,
    /// The teacher's reply, at most 500 characters.
    pub teacher_response: Option<String>,
    /// Submission timestamp. Anchors the student edit window.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Feedback {
    /// Age of the record in whole days at `now`.
    ///
    /// Truncates toward zero, so a record is "6 days old" until the full
    /// seventh day has elapsed.
    pub fn age_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_at).num_days()
    }
}
