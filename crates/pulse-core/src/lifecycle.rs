//! Feedback lifecycle rules.
//!
//! The functions here are the only code that mutates a [`Feedback`]
//! record after creation. Both take the current time as an argument, so
//! the edit-window rule is testable without a real clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::academic_year::AcademicYear;
use crate::error::{LifecycleError, ValidationError};
use crate::feedback::{Feedback, FeedbackStatus};
use crate::subject::Subject;

/// Students may edit their pending feedback for this many whole days
/// after submission.
pub const EDIT_WINDOW_DAYS: i64 = 7;

/// Content length bounds, inclusive.
pub const CONTENT_MIN: usize = 10;
/// See [`CONTENT_MIN`].
pub const CONTENT_MAX: usize = 1000;

/// Maximum length of a teacher's response.
pub const RESPONSE_MAX: usize = 500;

/// The student-supplied fields of a feedback record.
///
/// Used both at creation and when a student edits an existing record;
/// [`FeedbackDraft::validate`] enforces every field-level rule in one
/// place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackDraft {
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
}

impl FeedbackDraft {
    /// Check every field-level rule. `student_id` is the author; a draft
    /// addressed to the author's own account is rejected.
    pub fn validate(&self, student_id: Uuid) -> Result<(), ValidationError> {
        let len = self.content.chars().count();
        if !(CONTENT_MIN..=CONTENT_MAX).contains(&len) {
            return Err(ValidationError::ContentLength(len));
        }
        if !(1..=5).contains(&self.rating) {
            return Err(ValidationError::RatingRange(self.rating));
        }
        if !(1..=8).contains(&self.semester) {
            return Err(ValidationError::SemesterRange(self.semester));
        }
        if self.teacher_id == student_id {
            return Err(ValidationError::SelfFeedback);
        }
        Ok(())
    }

    /// Materialize a validated draft into a new pending record.
    pub fn into_feedback(
        self,
        student_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Feedback, ValidationError> {
        self.validate(student_id)?;
        Ok(Feedback {
            id: Uuid::new_v4(),
            student_id,
            teacher_id: self.teacher_id,
            subject: self.subject,
            content: self.content,
            rating: self.rating,
            semester: self.semester,
            academic_year: self.academic_year,
            is_anonymous: self.is_anonymous,
            status: FeedbackStatus::Pending,
            teacher_response: None,
            created_at: now,
            updated_at: now,
        })
    }
}

/// The fields a teacher may change on feedback addressed to them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeacherUpdate {
    /// Requested status, if changing.
    pub status: Option<FeedbackStatus>,
    /// Reply text, at most 500 characters.
    pub teacher_response: Option<String>,
}

/// Whether the author may still edit this record at `now`.
///
/// True only while the record is pending and strictly younger than
/// [`EDIT_WINDOW_DAYS`] whole days.
pub fn student_can_edit(record: &Feedback, now: DateTime<Utc>) -> bool {
    record.status == FeedbackStatus::Pending && record.age_days(now) < EDIT_WINDOW_DAYS
}

/// Apply a student's edit to their own pending record.
///
/// Status, teacher response, and identifiers are untouched; only the
/// draft fields are replaced. Fails if the record is no longer pending,
/// the edit window has closed, or the draft itself is invalid.
pub fn apply_student_edit(
    record: &mut Feedback,
    draft: &FeedbackDraft,
    now: DateTime<Utc>,
) -> Result<(), LifecycleError> {
    if record.status != FeedbackStatus::Pending {
        return Err(LifecycleError::NotPending(record.status));
    }
    let age = record.age_days(now);
    if age >= EDIT_WINDOW_DAYS {
        return Err(LifecycleError::EditWindowClosed { window: EDIT_WINDOW_DAYS, age });
    }
    draft.validate(record.student_id)?;

    record.teacher_id = draft.teacher_id;
    record.subject = draft.subject;
    record.content = draft.content.clone();
    record.rating = draft.rating;
    record.semester = draft.semester;
    record.academic_year = draft.academic_year.clone();
    record.is_anonymous = draft.is_anonymous;
    record.updated_at = now;
    Ok(())
}

/// Apply a teacher's status change and/or response.
///
/// Not window-gated: teachers may respond to and triage feedback at any
/// age. Status changes must follow the transition rules, and responses
/// are capped at [`RESPONSE_MAX`] characters.
pub fn apply_teacher_update(
    record: &mut Feedback,
    update: &TeacherUpdate,
    now: DateTime<Utc>,
) -> Result<(), LifecycleError> {
    if let Some(response) = &update.teacher_response {
        let len = response.chars().count();
        if len > RESPONSE_MAX {
            return Err(ValidationError::ResponseLength(len).into());
        }
    }
    if let Some(target) = update.status {
        if !record.status.can_transition_to(target) {
            return Err(LifecycleError::InvalidTransition { from: record.status, to: target });
        }
    }

    if let Some(target) = update.status {
        record.status = target;
    }
    if let Some(response) = &update.teacher_response {
        record.teacher_response = Some(response.clone());
    }
    record.updated_at = now;
    Ok(())
}
