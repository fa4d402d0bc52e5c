//! Feedback persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `feedback` table.
//! Lifecycle constraints are enforced at the application layer, not in
//! SQL.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use pulse_core::{AcademicYear, Feedback, FeedbackStatus, Subject};

/// Insert a new feedback record.
pub async fn insert(pool: &PgPool, record: &Feedback) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO feedback (id, student_id, teacher_id, subject, content, rating, semester,
                               academic_year, is_anonymous, status, teacher_response,
                               created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
    )
    .bind(record.id)
    .bind(record.student_id)
    .bind(record.teacher_id)
    .bind(record.subject.as_str())
    .bind(&record.content)
    .bind(i16::from(record.rating))
    .bind(i16::from(record.semester))
    .bind(record.academic_year.as_str())
    .bind(record.is_anonymous)
    .bind(record.status.as_str())
    .bind(&record.teacher_response)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Update every mutable field of a feedback record.
pub async fn update(pool: &PgPool, record: &Feedback) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE feedback SET teacher_id = $1, subject = $2, content = $3, rating = $4,
                             semester = $5, academic_year = $6, is_anonymous = $7,
                             status = $8, teacher_response = $9, updated_at = $10
         WHERE id = $11",
    )
    .bind(record.teacher_id)
    .bind(record.subject.as_str())
    .bind(&record.content)
    .bind(i16::from(record.rating))
    .bind(i16::from(record.semester))
    .bind(record.academic_year.as_str())
    .bind(record.is_anonymous)
    .bind(record.status.as_str())
    .bind(&record.teacher_response)
    .bind(record.updated_at)
    .bind(record.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a feedback record.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM feedback WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Load all feedback into the in-memory store on startup.
///
/// Rows whose subject, status, or academic year no longer parse are
/// skipped with an error log rather than loaded with guessed values.
pub async fn load_all(pool: &PgPool) -> Result<Vec<Feedback>, sqlx::Error> {
    let rows = sqlx::query_as::<_, FeedbackRow>(
        "SELECT id, student_id, teacher_id, subject, content, rating, semester,
                academic_year, is_anonymous, status, teacher_response, created_at, updated_at
         FROM feedback ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().filter_map(FeedbackRow::into_feedback).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct FeedbackRow {
    id: Uuid,
    student_id: Uuid,
    teacher_id: Uuid,
    subject: String,
    content: String,
    rating: i16,
    semester: i16,
    academic_year: String,
    is_anonymous: bool,
    status: String,
    teacher_response: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl FeedbackRow {
    fn into_feedback(self) -> Option<Feedback> {
        let subject: Subject = match self.subject.parse() {
            Ok(subject) => subject,
            Err(err) => {
                tracing::error!(id = %self.id, error = %err, "unparseable subject in feedback table — skipping row");
                return None;
            }
        };
        let academic_year = match AcademicYear::new(self.academic_year) {
            Ok(year) => year,
            Err(err) => {
                tracing::error!(id = %self.id, error = %err, "invalid academic year in feedback table — skipping row");
                return None;
            }
        };
        let status = match self.status.as_str() {
            "pending" => FeedbackStatus::Pending,
            "reviewed" => FeedbackStatus::Reviewed,
            "archived" => FeedbackStatus::Archived,
            other => {
                tracing::error!(id = %self.id, status = %other, "unknown status in feedback table — skipping row");
                return None;
            }
        };

        Some(Feedback {
            id: self.id,
            student_id: self.student_id,
            teacher_id: self.teacher_id,
            subject,
            content: self.content,
            rating: u8::try_from(self.rating).unwrap_or(1),
            semester: u8::try_from(self.semester).unwrap_or(1),
            academic_year,
            is_anonymous: self.is_anonymous,
            status,
            teacher_response: self.teacher_response,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
