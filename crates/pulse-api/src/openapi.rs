//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pulse API — Student Feedback Platform",
        version = "0.3.2",
        description = "REST API for the Pulse student-feedback platform: accounts and sessions, feedback submission and triage, and teacher analytics.",
        license(name = "MIT")
    ),
    paths(
        // Accounts & sessions
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::me,
        crate::routes::auth::update_profile,
        crate::routes::auth::update_password,
        crate::routes::auth::forgot_password,
        crate::routes::auth::reset_password,
        crate::routes::auth::list_teachers,
        // Feedback
        crate::routes::feedback::create_feedback,
        crate::routes::feedback::list_feedback,
        crate::routes::feedback::get_feedback,
        crate::routes::feedback::update_feedback,
        crate::routes::feedback::delete_feedback,
        // Analytics
        crate::routes::analytics::stats,
        crate::routes::analytics::analytics,
        crate::routes::analytics::dashboard_stats,
    ),
    components(schemas(
        // Envelopes
        crate::error::ErrorBody,
        crate::routes::MessageBody,
        // Auth DTOs
        crate::routes::auth::RegisterRequest,
        crate::routes::auth::LoginRequest,
        crate::routes::auth::UpdateProfileRequest,
        crate::routes::auth::UpdatePasswordRequest,
        crate::routes::auth::ForgotPasswordRequest,
        crate::routes::auth::ResetPasswordRequest,
        crate::routes::auth::UserView,
        crate::routes::auth::TokenResponse,
        crate::routes::auth::UserResponse,
        crate::routes::auth::TeacherView,
        crate::routes::auth::TeachersResponse,
        // Feedback DTOs
        crate::routes::feedback::CreateFeedbackRequest,
        crate::routes::feedback::UpdateFeedbackRequest,
        crate::routes::feedback::PartyRef,
        crate::routes::feedback::FeedbackView,
        crate::routes::feedback::FeedbackResponse,
        crate::routes::feedback::FeedbackListResponse,
        // Analytics DTOs
        crate::routes::analytics::StatsData,
        crate::routes::analytics::StatsResponse,
        crate::routes::analytics::AnalyticsData,
        crate::routes::analytics::AnalyticsResponse,
        crate::routes::analytics::ActivityItem,
        crate::routes::analytics::DashboardData,
        crate::routes::analytics::DashboardResponse,
    )),
    tags(
        (name = "auth", description = "Accounts, sessions, and password management"),
        (name = "feedback", description = "Feedback submission, listing, editing, and triage"),
        (name = "analytics", description = "Aggregates, trends, and dashboard cards"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
///
/// Serves the OpenAPI JSON spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
