//! # Feedback API
//!
//! Submission, listing, editing, triage, and deletion of feedback
//! records.
//!
//! ## Endpoints
//!
//! - `GET /feedback` — list the caller's scope (authored / addressed)
//! - `POST /feedback` — submit feedback (students only)
//! - `GET /feedback/:id` — fetch one record (involved parties only)
//! - `PUT /feedback/:id` — role-dispatched update: students edit
//!   content inside the 7-day window, teachers set status and response
//! - `DELETE /feedback/:id` — remove a record (either involved party)
//!
//! Anonymity is a read-side concern: the record always stores the
//! author id, and [`feedback_view`] drops the student block for every
//! viewer except the author.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use pulse_core::lifecycle::{FeedbackDraft, TeacherUpdate};
use pulse_core::policy::{can_perform, Action, Actor, Scope};
use pulse_core::{AcademicYear, Feedback, FeedbackStatus, Role, Subject, User};

use crate::auth::CurrentUser;
use crate::db;
use crate::error::AppError;
use crate::extractors::extract_json;
use crate::routes::MessageBody;
use crate::state::{AppState, Store};

// ── Request DTOs ────────────────────────────────────────────────────

/// Request to submit new feedback.
///
/// `subject` and `academicYear` validate during deserialization; an
/// unknown subject or malformed year never reaches the handler.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackRequest {
    /// The teacher the feedback is about.
    pub teacher_id: Uuid,
    /// Subject from the fixed catalog.
    #[schema(value_type = String)]
    pub subject: Subject,
    /// Free-text body, 10–1000 characters.
    pub content: String,
    /// Star rating, 1–5.
    pub rating: u8,
    /// Semester of study, 1–8.
    pub semester: u8,
    /// Academic year, `YYYY-YYYY` with consecutive years.
    #[schema(value_type = String)]
    pub academic_year: AcademicYear,
    /// Withhold the author's identity from the teacher.
    #[serde(default)]
    pub is_anonymous: bool,
}

impl CreateFeedbackRequest {
    fn into_draft(self) -> FeedbackDraft {
        FeedbackDraft {
            teacher_id: self.teacher_id,
            subject: self.subject,
            content: self.content,
            rating: self.rating,
            semester: self.semester,
            academic_year: self.academic_year,
            is_anonymous: self.is_anonymous,
        }
    }
}

/// Request to update a record. Which fields take effect depends on the
/// caller's role: students change the draft fields, teachers change
/// status and response. Fields outside the caller's role are ignored,
/// not errors, so a student cannot smuggle a status change and a
/// teacher cannot rewrite content.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeedbackRequest {
    /// New addressed teacher (students).
    pub teacher_id: Option<Uuid>,
    /// New subject (students).
    #[schema(value_type = Option<String>)]
    pub subject: Option<Subject>,
    /// New body (students).
    pub content: Option<String>,
    /// New rating (students).
    pub rating: Option<u8>,
    /// New semester (students).
    pub semester: Option<u8>,
    /// New academic year (students).
    #[schema(value_type = Option<String>)]
    pub academic_year: Option<AcademicYear>,
    /// New anonymity flag (students).
    pub is_anonymous: Option<bool>,
    /// New lifecycle status (teachers).
    #[schema(value_type = Option<String>)]
    pub status: Option<FeedbackStatus>,
    /// Reply text, at most 500 characters (teachers).
    pub teacher_response: Option<String>,
}

impl UpdateFeedbackRequest {
    /// The record's current draft fields overlaid with whatever the
    /// student provided.
    fn merged_draft(&self, record: &Feedback) -> FeedbackDraft {
        FeedbackDraft {
            teacher_id: self.teacher_id.unwrap_or(record.teacher_id),
            subject: self.subject.unwrap_or(record.subject),
            content: self.content.clone().unwrap_or_else(|| record.content.clone()),
            rating: self.rating.unwrap_or(record.rating),
            semester: self.semester.unwrap_or(record.semester),
            academic_year: self.academic_year.clone().unwrap_or_else(|| record.academic_year.clone()),
            is_anonymous: self.is_anonymous.unwrap_or(record.is_anonymous),
        }
    }

    fn teacher_update(&self) -> TeacherUpdate {
        TeacherUpdate { status: self.status, teacher_response: self.teacher_response.clone() }
    }
}

// ── View DTOs ───────────────────────────────────────────────────────

/// A user referenced from a feedback record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartyRef {
    /// Account id.
    pub id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Department, teachers only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl PartyRef {
    fn of(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            department: user.department.clone(),
        }
    }
}

/// Wire representation of a feedback record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackView {
    /// Record id.
    pub id: Uuid,
    /// The author. Omitted entirely when the record is anonymous and
    /// the viewer is not the author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<PartyRef>,
    /// The addressed teacher.
    pub teacher: Option<PartyRef>,
    /// Subject.
    #[schema(value_type = String)]
    pub subject: Subject,
    /// Body text.
    pub content: String,
    /// Star rating, 1–5.
    pub rating: u8,
    /// Semester, 1–8.
    pub semester: u8,
    /// Academic year.
    #[schema(value_type = String)]
    pub academic_year: AcademicYear,
    /// Whether the author's identity is withheld.
    pub is_anonymous: bool,
    /// Lifecycle status.
    #[schema(value_type = String)]
    pub status: FeedbackStatus,
    /// Teacher's reply, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_response: Option<String>,
    /// Submission timestamp.
    pub created_at: chrono::DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: chrono::DateTime<Utc>,
}

/// Map a record to its wire form as seen by `viewer`.
pub(crate) fn feedback_view(record: &Feedback, viewer: &Actor, users: &Store<User>) -> FeedbackView {
    let reveal_student = !record.is_anonymous || viewer.id == record.student_id;
    let student = if reveal_student {
        users.get(&record.student_id).map(|u| PartyRef::of(&u))
    } else {
        None
    };
    let teacher = users.get(&record.teacher_id).map(|u| PartyRef::of(&u));

    FeedbackView {
        id: record.id,
        student,
        teacher,
        subject: record.subject,
        content: record.content.clone(),
        rating: record.rating,
        semester: record.semester,
        academic_year: record.academic_year.clone(),
        is_anonymous: record.is_anonymous,
        status: record.status,
        teacher_response: record.teacher_response.clone(),
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

/// Response wrapping a single record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeedbackResponse {
    /// Always `true`.
    pub success: bool,
    /// The record.
    pub data: FeedbackView,
}

/// Response wrapping a list of records.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeedbackListResponse {
    /// Always `true`.
    pub success: bool,
    /// Number of records.
    pub count: usize,
    /// The records, newest first.
    pub data: Vec<FeedbackView>,
}

// ── Router ──────────────────────────────────────────────────────────

/// Feedback CRUD routes, mounted behind the auth middleware.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/feedback", get(list_feedback).post(create_feedback))
        .route(
            "/feedback/:id",
            get(get_feedback).put(update_feedback).delete(delete_feedback),
        )
}

async fn mirror_insert(state: &AppState, record: &Feedback) {
    if let Some(pool) = &state.db_pool {
        // Failures are logged inside with_retry; memory stays authoritative.
        let _ = db::with_retry("feedback.insert", || db::feedback::insert(pool, record)).await;
    }
}

async fn mirror_update(state: &AppState, record: &Feedback) {
    if let Some(pool) = &state.db_pool {
        let _ = db::with_retry("feedback.update", || db::feedback::update(pool, record)).await;
    }
}

async fn mirror_delete(state: &AppState, id: Uuid) {
    if let Some(pool) = &state.db_pool {
        let _ = db::with_retry("feedback.delete", || db::feedback::delete(pool, id)).await;
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Feedback not found".to_string())
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /feedback — Submit new feedback.
#[utoipa::path(
    post,
    path = "/feedback",
    request_body = CreateFeedbackRequest,
    responses(
        (status = 201, description = "Feedback created, status forced to pending", body = FeedbackResponse),
        (status = 400, description = "Validation error", body = crate::error::ErrorBody),
        (status = 403, description = "Caller is not a student", body = crate::error::ErrorBody),
    ),
    tag = "feedback"
)]
pub(crate) async fn create_feedback(
    State(state): State<AppState>,
    user: CurrentUser,
    body: Result<Json<CreateFeedbackRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<FeedbackResponse>), AppError> {
    let req = extract_json(body)?;
    let actor = user.actor();
    can_perform(&actor, Action::Create, None)?;

    // The target must be a real, active teacher account.
    let valid_target = state
        .users
        .get(&req.teacher_id)
        .map_or(false, |u| u.role == Role::Teacher && u.is_active);
    if !valid_target {
        return Err(AppError::Validation("teacherId does not refer to an active teacher".to_string()));
    }

    let record = req.into_draft().into_feedback(actor.id, Utc::now())?;
    state.feedback.insert(record.id, record.clone());
    mirror_insert(&state, &record).await;
    tracing::info!(feedback_id = %record.id, student_id = %actor.id, "feedback submitted");

    let view = feedback_view(&record, &actor, &state.users);
    Ok((StatusCode::CREATED, Json(FeedbackResponse { success: true, data: view })))
}

/// GET /feedback — List the caller's records, newest first.
#[utoipa::path(
    get,
    path = "/feedback",
    responses(
        (status = 200, description = "Records in the caller's scope", body = FeedbackListResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
    ),
    tag = "feedback"
)]
pub(crate) async fn list_feedback(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Json<FeedbackListResponse> {
    let actor = user.actor();
    let scope = Scope::for_actor(&actor);

    let mut records = state.feedback.filter(|r| scope.matches(r));
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let data: Vec<FeedbackView> =
        records.iter().map(|r| feedback_view(r, &actor, &state.users)).collect();
    Json(FeedbackListResponse { success: true, count: data.len(), data })
}

/// GET /feedback/:id — Fetch one record.
#[utoipa::path(
    get,
    path = "/feedback/{id}",
    params(("id" = Uuid, Path, description = "Feedback record id")),
    responses(
        (status = 200, description = "The record", body = FeedbackResponse),
        (status = 403, description = "Caller is not involved", body = crate::error::ErrorBody),
        (status = 404, description = "No such record", body = crate::error::ErrorBody),
    ),
    tag = "feedback"
)]
pub(crate) async fn get_feedback(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<FeedbackResponse>, AppError> {
    let actor = user.actor();
    let record = state.feedback.get(&id).ok_or_else(not_found)?;
    can_perform(&actor, Action::Read, Some(&record))?;

    let view = feedback_view(&record, &actor, &state.users);
    Ok(Json(FeedbackResponse { success: true, data: view }))
}

/// PUT /feedback/:id — Role-dispatched update.
#[utoipa::path(
    put,
    path = "/feedback/{id}",
    params(("id" = Uuid, Path, description = "Feedback record id")),
    request_body = UpdateFeedbackRequest,
    responses(
        (status = 200, description = "The updated record", body = FeedbackResponse),
        (status = 400, description = "Validation error or invalid transition", body = crate::error::ErrorBody),
        (status = 403, description = "Not permitted, not pending, or window closed", body = crate::error::ErrorBody),
        (status = 404, description = "No such record", body = crate::error::ErrorBody),
    ),
    tag = "feedback"
)]
pub(crate) async fn update_feedback(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    body: Result<Json<UpdateFeedbackRequest>, JsonRejection>,
) -> Result<Json<FeedbackResponse>, AppError> {
    let req = extract_json(body)?;
    let actor = user.actor();
    let now = Utc::now();

    // Precondition checks and the write happen under one lock, so a
    // concurrent triage cannot slip between them.
    let outcome = state.feedback.try_update(&id, |record| {
        match actor.role {
            Role::Student => {
                can_perform(&actor, Action::UpdateContent, Some(&*record))?;
                let draft = req.merged_draft(record);
                pulse_core::lifecycle::apply_student_edit(record, &draft, now)?;
            }
            Role::Teacher => {
                can_perform(&actor, Action::UpdateStatus, Some(&*record))?;
                pulse_core::lifecycle::apply_teacher_update(record, &req.teacher_update(), now)?;
            }
        }
        Ok::<Feedback, AppError>(record.clone())
    });

    let record = outcome.ok_or_else(not_found)??;
    mirror_update(&state, &record).await;
    tracing::info!(feedback_id = %record.id, actor_id = %actor.id, "feedback updated");

    let view = feedback_view(&record, &actor, &state.users);
    Ok(Json(FeedbackResponse { success: true, data: view }))
}

/// DELETE /feedback/:id — Remove a record.
#[utoipa::path(
    delete,
    path = "/feedback/{id}",
    params(("id" = Uuid, Path, description = "Feedback record id")),
    responses(
        (status = 200, description = "Record removed", body = MessageBody),
        (status = 403, description = "Caller is not involved", body = crate::error::ErrorBody),
        (status = 404, description = "No such record", body = crate::error::ErrorBody),
    ),
    tag = "feedback"
)]
pub(crate) async fn delete_feedback(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageBody>, AppError> {
    let actor = user.actor();
    let record = state.feedback.get(&id).ok_or_else(not_found)?;
    can_perform(&actor, Action::Delete, Some(&record))?;

    state.feedback.remove(&id);
    mirror_delete(&state, id).await;
    tracing::info!(feedback_id = %id, actor_id = %actor.id, "feedback deleted");

    Ok(Json(MessageBody::new("Feedback deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_record(student_id: Uuid, teacher_id: Uuid, anonymous: bool) -> Feedback {
        let now = Utc::now();
        Feedback {
            id: Uuid::new_v4(),
            student_id,
            teacher_id,
            subject: Subject::DataStructuresAndAlgorithms,
            content: "Office hours made the hard parts click.".into(),
            rating: 5,
            semester: 2,
            academic_year: AcademicYear::new("2024-2025").unwrap(),
            is_anonymous: anonymous,
            status: FeedbackStatus::Pending,
            teacher_response: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_user(id: Uuid, role: Role) -> User {
        let now = Utc::now();
        User {
            id,
            username: format!("user-{id}"),
            email: format!("{id}@example.edu"),
            password_hash: "$argon2id$stub".into(),
            role,
            first_name: "Nadia".into(),
            last_name: "Raza".into(),
            student_id: (role == Role::Student).then(|| "FA22-BCS-011".to_string()),
            year_of_study: (role == Role::Student).then_some(2),
            department: (role == Role::Teacher).then(|| "Computer Science".to_string()),
            is_active: true,
            reset_token_hash: None,
            reset_token_expires: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn users_with(parties: &[&User]) -> Store<User> {
        let store = Store::new();
        for user in parties {
            store.insert(user.id, (*user).clone());
        }
        store
    }

    #[test]
    fn anonymous_record_hides_student_from_teacher() {
        let student = sample_user(Uuid::new_v4(), Role::Student);
        let teacher = sample_user(Uuid::new_v4(), Role::Teacher);
        let users = users_with(&[&student, &teacher]);
        let record = sample_record(student.id, teacher.id, true);

        let teacher_actor = Actor { id: teacher.id, role: Role::Teacher };
        let view = feedback_view(&record, &teacher_actor, &users);
        assert!(view.student.is_none());
        assert!(view.is_anonymous);

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("student").is_none(), "student key must be absent, not null");
    }

    #[test]
    fn anonymous_record_still_visible_to_its_author() {
        let student = sample_user(Uuid::new_v4(), Role::Student);
        let teacher = sample_user(Uuid::new_v4(), Role::Teacher);
        let users = users_with(&[&student, &teacher]);
        let record = sample_record(student.id, teacher.id, true);

        let author = Actor { id: student.id, role: Role::Student };
        let view = feedback_view(&record, &author, &users);
        assert_eq!(view.student.unwrap().id, student.id);
    }

    #[test]
    fn named_record_shows_both_parties() {
        let student = sample_user(Uuid::new_v4(), Role::Student);
        let teacher = sample_user(Uuid::new_v4(), Role::Teacher);
        let users = users_with(&[&student, &teacher]);
        let record = sample_record(student.id, teacher.id, false);

        let teacher_actor = Actor { id: teacher.id, role: Role::Teacher };
        let view = feedback_view(&record, &teacher_actor, &users);
        assert_eq!(view.student.unwrap().id, student.id);
        let teacher_ref = view.teacher.unwrap();
        assert_eq!(teacher_ref.id, teacher.id);
        assert_eq!(teacher_ref.department.as_deref(), Some("Computer Science"));
    }

    #[test]
    fn merged_draft_overlays_only_provided_fields() {
        let record = sample_record(Uuid::new_v4(), Uuid::new_v4(), false);
        let req = UpdateFeedbackRequest { rating: Some(3), ..Default::default() };
        let draft = req.merged_draft(&record);
        assert_eq!(draft.rating, 3);
        assert_eq!(draft.content, record.content);
        assert_eq!(draft.teacher_id, record.teacher_id);
        assert_eq!(draft.academic_year, record.academic_year);
    }

    #[test]
    fn student_update_request_cannot_carry_status() {
        // Even if a student sends a status field, merged_draft never
        // reads it and apply_student_edit never writes status.
        let record = sample_record(Uuid::new_v4(), Uuid::new_v4(), false);
        let req = UpdateFeedbackRequest {
            status: Some(FeedbackStatus::Reviewed),
            teacher_response: Some("self-approved".into()),
            ..Default::default()
        };
        let draft = req.merged_draft(&record);
        let mut edited = record.clone();
        pulse_core::lifecycle::apply_student_edit(&mut edited, &draft, record.created_at).unwrap();
        assert_eq!(edited.status, FeedbackStatus::Pending);
        assert!(edited.teacher_response.is_none());
    }

    #[test]
    fn create_request_deserializes_camel_case() {
        let json = serde_json::json!({
            "teacherId": Uuid::new_v4(),
            "subject": "Data Structures and Algorithms",
            "content": "Weekly quizzes kept the pace honest.",
            "rating": 4,
            "semester": 3,
            "academicYear": "2024-2025",
            "isAnonymous": true
        });
        let req: CreateFeedbackRequest = serde_json::from_value(json).unwrap();
        assert_eq!(req.subject, Subject::DataStructuresAndAlgorithms);
        assert!(req.is_anonymous);
    }

    #[test]
    fn create_request_defaults_anonymity_off() {
        let json = serde_json::json!({
            "teacherId": Uuid::new_v4(),
            "subject": "Operating Systems",
            "content": "Scheduling labs were the highlight.",
            "rating": 5,
            "semester": 4,
            "academicYear": "2024-2025"
        });
        let req: CreateFeedbackRequest = serde_json::from_value(json).unwrap();
        assert!(!req.is_anonymous);
    }

    #[test]
    fn view_serializes_camel_case_timestamps_and_year() {
        let student = sample_user(Uuid::new_v4(), Role::Student);
        let teacher = sample_user(Uuid::new_v4(), Role::Teacher);
        let users = users_with(&[&student, &teacher]);
        let mut record = sample_record(student.id, teacher.id, false);
        record.created_at = Utc::now() - Duration::days(1);

        let actor = Actor { id: student.id, role: Role::Student };
        let json = serde_json::to_value(feedback_view(&record, &actor, &users)).unwrap();
        assert!(json.get("academicYear").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("isAnonymous").is_some());
        assert!(json.get("teacherResponse").is_none(), "absent response omitted");
    }
}
