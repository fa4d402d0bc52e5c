//! Authorization policy.
//!
//! One table, exhaustively matched: [`can_perform`] decides whether an
//! actor may carry out an action, optionally against a specific
//! feedback record. Handlers call this instead of scattering role and
//! ownership checks inline.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::feedback::Feedback;
use crate::user::Role;

/// The authenticated principal a request runs as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// The account id.
    pub id: Uuid,
    /// The account role.
    pub role: Role,
}

/// Actions the policy governs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Submit new feedback.
    Create,
    /// Read a single feedback record.
    Read,
    /// Edit a record's student-supplied fields.
    UpdateContent,
    /// Change a record's status or attach a response.
    UpdateStatus,
    /// Delete a record.
    Delete,
    /// Access analytics and dashboard aggregates.
    ViewAnalytics,
    /// List teacher accounts for the submission form.
    ListTeachers,
}

/// Why an action was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// The action is reserved for students.
    #[error("Only students can submit feedback")]
    StudentsOnly,
    /// The action is reserved for teachers.
    #[error("Only teachers can access analytics")]
    TeachersOnly,
    /// The actor is neither the author nor the addressed teacher.
    #[error("Not authorized to access this feedback")]
    NotInvolved,
    /// Students may only edit records they authored.
    #[error("Not authorized to update this feedback")]
    NotAuthor,
    /// Teachers may only triage feedback addressed to them.
    #[error("Not authorized to update this feedback")]
    NotAddressee,
}

/// Decide whether `actor` may perform `action`.
///
/// Record-scoped actions (`Read`, `UpdateContent`, `UpdateStatus`,
/// `Delete`) require the record; passing `None` for those means the
/// check is role-only and ownership is enforced elsewhere, which no
/// handler in this codebase does — they all pass the record.
pub fn can_perform(actor: &Actor, action: Action, record: Option<&Feedback>) -> Result<(), Denial> {
    match (action, actor.role) {
        (Action::Create, Role::Student) => Ok(()),
        (Action::Create, Role::Teacher) => Err(Denial::StudentsOnly),

        (Action::ViewAnalytics, Role::Teacher) => Ok(()),
        (Action::ViewAnalytics, Role::Student) => Err(Denial::TeachersOnly),

        // Both roles may list teachers; students need it for the
        // submission form, teachers for their own directory page.
        (Action::ListTeachers, _) => Ok(()),

        (Action::Read, role) | (Action::Delete, role) => match record {
            Some(record) => {
                let involved = match role {
                    Role::Student => record.student_id == actor.id,
                    Role::Teacher => record.teacher_id == actor.id,
                };
                if involved {
                    Ok(())
                } else {
                    Err(Denial::NotInvolved)
                }
            }
            None => Ok(()),
        },

        (Action::UpdateContent, Role::Student) => match record {
            Some(record) if record.student_id == actor.id => Ok(()),
            Some(_) => Err(Denial::NotAuthor),
            None => Ok(()),
        },
        (Action::UpdateContent, Role::Teacher) => Err(Denial::NotAuthor),

        (Action::UpdateStatus, Role::Teacher) => match record {
            Some(record) if record.teacher_id == actor.id => Ok(()),
            Some(_) => Err(Denial::NotAddressee),
            None => Ok(()),
        },
        (Action::UpdateStatus, Role::Student) => Err(Denial::NotAddressee),
    }
}

/// The listing scope an actor sees: students see their own submissions,
/// teachers see feedback addressed to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    /// Records authored by this student.
    AuthoredBy(Uuid),
    /// Records addressed to this teacher.
    TaughtBy(Uuid),
}

impl Scope {
    /// The scope `actor` is entitled to.
    pub fn for_actor(actor: &Actor) -> Self {
        match actor.role {
            Role::Student => Self::AuthoredBy(actor.id),
            Role::Teacher => Self::TaughtBy(actor.id),
        }
    }

    /// Whether `record` falls inside this scope.
    pub fn matches(&self, record: &Feedback) -> bool {
        match self {
            Self::AuthoredBy(id) => record.student_id == *id,
            Self::TaughtBy(id) => record.teacher_id == *id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::academic_year::AcademicYear;
    use crate::feedback::FeedbackStatus;
    use crate::subject::Subject;
    use chrono::Utc;

    fn record(student_id: Uuid, teacher_id: Uuid) -> Feedback {
        let now = Utc::now();
        Feedback {
            id: Uuid::new_v4(),
            student_id,
            teacher_id,
            subject: Subject::SoftwareEngineering,
            content: "Project work mirrored real team workflows.".into(),
            rating: 5,
            semester: 6,
            academic_year: AcademicYear::new("2024-2025").unwrap(),
            is_anonymous: false,
            status: FeedbackStatus::Pending,
            teacher_response: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn student() -> Actor {
        Actor { id: Uuid::new_v4(), role: Role::Student }
    }

    fn teacher() -> Actor {
        Actor { id: Uuid::new_v4(), role: Role::Teacher }
    }

    #[test]
    fn only_students_create() {
        assert!(can_perform(&student(), Action::Create, None).is_ok());
        assert_eq!(can_perform(&teacher(), Action::Create, None), Err(Denial::StudentsOnly));
    }

    #[test]
    fn only_teachers_view_analytics() {
        assert!(can_perform(&teacher(), Action::ViewAnalytics, None).is_ok());
        assert_eq!(can_perform(&student(), Action::ViewAnalytics, None), Err(Denial::TeachersOnly));
    }

    #[test]
    fn both_roles_list_teachers() {
        assert!(can_perform(&student(), Action::ListTeachers, None).is_ok());
        assert!(can_perform(&teacher(), Action::ListTeachers, None).is_ok());
    }

    #[test]
    fn read_requires_involvement() {
        let author = student();
        let addressee = teacher();
        let rec = record(author.id, addressee.id);

        assert!(can_perform(&author, Action::Read, Some(&rec)).is_ok());
        assert!(can_perform(&addressee, Action::Read, Some(&rec)).is_ok());
        assert_eq!(can_perform(&student(), Action::Read, Some(&rec)), Err(Denial::NotInvolved));
        assert_eq!(can_perform(&teacher(), Action::Read, Some(&rec)), Err(Denial::NotInvolved));
    }

    #[test]
    fn content_edits_are_author_only() {
        let author = student();
        let addressee = teacher();
        let rec = record(author.id, addressee.id);

        assert!(can_perform(&author, Action::UpdateContent, Some(&rec)).is_ok());
        assert_eq!(
            can_perform(&student(), Action::UpdateContent, Some(&rec)),
            Err(Denial::NotAuthor)
        );
        assert_eq!(
            can_perform(&addressee, Action::UpdateContent, Some(&rec)),
            Err(Denial::NotAuthor)
        );
    }

    #[test]
    fn status_edits_are_addressee_only() {
        let author = student();
        let addressee = teacher();
        let rec = record(author.id, addressee.id);

        assert!(can_perform(&addressee, Action::UpdateStatus, Some(&rec)).is_ok());
        assert_eq!(
            can_perform(&teacher(), Action::UpdateStatus, Some(&rec)),
            Err(Denial::NotAddressee)
        );
        assert_eq!(
            can_perform(&author, Action::UpdateStatus, Some(&rec)),
            Err(Denial::NotAddressee)
        );
    }

    #[test]
    fn either_party_may_delete() {
        let author = student();
        let addressee = teacher();
        let rec = record(author.id, addressee.id);

        assert!(can_perform(&author, Action::Delete, Some(&rec)).is_ok());
        assert!(can_perform(&addressee, Action::Delete, Some(&rec)).is_ok());
        assert_eq!(can_perform(&student(), Action::Delete, Some(&rec)), Err(Denial::NotInvolved));
    }

    #[test]
    fn scope_follows_role() {
        let author = student();
        let addressee = teacher();
        let rec = record(author.id, addressee.id);

        assert_eq!(Scope::for_actor(&author), Scope::AuthoredBy(author.id));
        assert_eq!(Scope::for_actor(&addressee), Scope::TaughtBy(addressee.id));
        assert!(Scope::AuthoredBy(author.id).matches(&rec));
        assert!(Scope::TaughtBy(addressee.id).matches(&rec));
        assert!(!Scope::AuthoredBy(Uuid::new_v4()).matches(&rec));
    }
}
