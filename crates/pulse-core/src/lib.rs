#![deny(missing_docs)]

//! # pulse-core — Domain Model for the Pulse Feedback Platform
//!
//! This crate defines the types and rules every other crate in the
//! workspace depends on. It has no internal crate dependencies — only
//! `serde`, `thiserror`, `chrono`, and `uuid` from the
//! external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Closed enums for roles, subjects, and statuses.** Roles are not
//!    strings: adding a role forces every `match` in the codebase to
//!    address it. The same holds for the 20-entry [`Subject`] catalog and
//!    [`FeedbackStatus`].
//!
//! 2. **Validated newtypes.** An [`AcademicYear`] cannot exist unless it
//!    matches `YYYY-YYYY` with `end == start + 1`.
//!
//! 3. **Pure decision functions.** The authorization policy
//!    ([`policy::can_perform`]) and the lifecycle rules
//!    ([`lifecycle::apply_student_edit`], [`lifecycle::apply_teacher_update`])
//!    take explicit inputs — including the current time — and touch no
//!    global state, so every rule is unit-testable without a clock or a
//!    database.
//!
//! 4. **Structured errors with `thiserror`.** No `Box<dyn Error>`, no
//!    `.unwrap()` outside tests.

pub mod academic_year;
pub mod error;
pub mod feedback;
pub mod lifecycle;
pub mod policy;
pub mod subject;
pub mod user;

// Re-export primary types at crate root for ergonomic imports.
pub use academic_year::AcademicYear;
pub use error::{LifecycleError, ValidationError};
pub use feedback::{Feedback, FeedbackStatus};
pub use lifecycle::{FeedbackDraft, TeacherUpdate, EDIT_WINDOW_DAYS};
pub use policy::{can_perform, Action, Actor, Denial, Scope};
pub use subject::Subject;
pub use user::{Role, User};
