//! # Stats, Analytics & Dashboard API
//!
//! Read-only aggregate views over the caller's feedback scope. All
//! numbers come from `pulse-analytics`; this module only selects the
//! records the caller is entitled to and shapes the response.
//!
//! ## Endpoints
//!
//! - `GET /feedback/stats` — quick counters for the header bar
//! - `GET /feedback/analytics?timeRange=` — teacher analytics page
//! - `GET /feedback/dashboard-stats?timeRange=` — dashboard cards

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use pulse_analytics::{
    average_rating, change_percent, daily_trends, growth_percent, rating_distribution,
    response_rate, status_breakdown, subject_breakdown, DailyPoint, StatusBreakdown,
    SubjectSummary, TimeRange, Window,
};
use pulse_core::policy::{can_perform, Action, Scope};
use pulse_core::Feedback;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::routes::feedback::{feedback_view, FeedbackView};
use crate::state::AppState;

// ── Query & response DTOs ───────────────────────────────────────────

/// Time-range selector shared by the analytics endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RangeQuery {
    /// `week`, `month`, or `year`; anything else falls back to `month`.
    #[serde(rename = "timeRange")]
    pub time_range: Option<String>,
}

impl RangeQuery {
    fn range(&self) -> TimeRange {
        TimeRange::parse_lenient(self.time_range.as_deref())
    }
}

/// Quick counters for the caller's scope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsData {
    /// All records in scope.
    pub total: u64,
    /// Mean rating across the scope.
    pub average_rating: f64,
    /// Records awaiting review.
    pub pending: u64,
    /// Records already reviewed.
    pub reviewed: u64,
}

/// Response wrapping [`StatsData`].
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatsResponse {
    /// Always `true`.
    pub success: bool,
    /// The counters.
    pub data: StatsData,
}

/// Analytics page payload for a teacher.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsData {
    /// The range the figures cover.
    #[schema(value_type = String)]
    pub time_range: TimeRange,
    /// Records submitted inside the window.
    pub total_feedback: u64,
    /// Mean rating inside the window.
    pub average_rating: f64,
    /// Count per star, index 0 holding one-star counts.
    pub rating_distribution: [u64; 5],
    /// Count per lifecycle status inside the window.
    #[schema(value_type = Object)]
    pub status_breakdown: StatusBreakdown,
    /// Per-subject count and mean, busiest subjects first.
    #[schema(value_type = Vec<Object>)]
    pub subject_breakdown: Vec<SubjectSummary>,
    /// Share of in-window records carrying a response, percent.
    pub response_rate: f64,
    /// Day-by-day submissions and mean ratings; quiet days are absent.
    #[schema(value_type = Vec<Object>)]
    pub trends: Vec<DailyPoint>,
    /// The five newest in-window records.
    pub recent_feedback: Vec<FeedbackView>,
}

/// Response wrapping [`AnalyticsData`].
#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyticsResponse {
    /// Always `true`.
    pub success: bool,
    /// The analytics payload.
    pub data: AnalyticsData,
}

/// One line of the dashboard activity feed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActivityItem {
    /// The record the line refers to.
    pub id: Uuid,
    /// Human-readable line; anonymous submissions name no student.
    pub description: String,
    /// When it happened.
    pub date: DateTime<Utc>,
}

/// Dashboard card payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    /// All records in the caller's scope, regardless of window.
    pub total_feedback: u64,
    /// Mean rating inside the current window.
    pub average_rating: f64,
    /// Pending records in scope.
    pub pending: u64,
    /// Reviewed records in scope.
    pub reviewed: u64,
    /// Registered accounts of any role.
    pub total_users: u64,
    /// Share of in-window records carrying a response, percent.
    pub response_rate: f64,
    /// Submission count, current window vs the one before.
    pub feedback_growth: f64,
    /// Mean rating, current window vs the one before.
    pub rating_change: f64,
    /// Response rate, current window vs the one before.
    pub response_rate_change: f64,
    /// The five newest activity lines in scope.
    pub recent_activity: Vec<ActivityItem>,
}

/// Response wrapping [`DashboardData`].
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    /// Always `true`.
    pub success: bool,
    /// The dashboard payload.
    pub data: DashboardData,
}

// ── Router ──────────────────────────────────────────────────────────

/// Aggregate routes, mounted behind the auth middleware. Registered
/// before the `/feedback/:id` wildcard; static segments win routing.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/feedback/stats", get(stats))
        .route("/feedback/analytics", get(analytics))
        .route("/feedback/dashboard-stats", get(dashboard_stats))
}

fn scoped_records(state: &AppState, scope: &Scope) -> Vec<Feedback> {
    state.feedback.filter(|r| scope.matches(r))
}

fn in_window<'a>(records: &'a [Feedback], window: &Window) -> Vec<&'a Feedback> {
    records.iter().filter(|r| window.contains(r.created_at)).collect()
}

// ── Handlers ────────────────────────────────────────────────────────

/// GET /feedback/stats — Quick counters for the caller's scope.
#[utoipa::path(
    get,
    path = "/feedback/stats",
    responses(
        (status = 200, description = "Counters over the caller's scope", body = StatsResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
    ),
    tag = "analytics"
)]
pub(crate) async fn stats(State(state): State<AppState>, user: CurrentUser) -> Json<StatsResponse> {
    let actor = user.actor();
    let records = scoped_records(&state, &Scope::for_actor(&actor));
    let refs: Vec<&Feedback> = records.iter().collect();
    let breakdown = status_breakdown(&refs);

    Json(StatsResponse {
        success: true,
        data: StatsData {
            total: refs.len() as u64,
            average_rating: average_rating(&refs),
            pending: breakdown.pending,
            reviewed: breakdown.reviewed,
        },
    })
}

/// GET /feedback/analytics — Teacher analytics over a time range.
#[utoipa::path(
    get,
    path = "/feedback/analytics",
    params(RangeQuery),
    responses(
        (status = 200, description = "Windowed analytics for the teacher", body = AnalyticsResponse),
        (status = 403, description = "Caller is a student", body = crate::error::ErrorBody),
    ),
    tag = "analytics"
)]
pub(crate) async fn analytics(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<RangeQuery>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let actor = user.actor();
    can_perform(&actor, Action::ViewAnalytics, None)?;

    let range = query.range();
    let window = range.window_ending(Utc::now());
    let records = scoped_records(&state, &Scope::for_actor(&actor));
    let windowed = in_window(&records, &window);

    let mut recent: Vec<&Feedback> = windowed.clone();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let recent_feedback: Vec<FeedbackView> = recent
        .iter()
        .take(5)
        .map(|r| feedback_view(r, &actor, &state.users))
        .collect();

    Ok(Json(AnalyticsResponse {
        success: true,
        data: AnalyticsData {
            time_range: range,
            total_feedback: windowed.len() as u64,
            average_rating: average_rating(&windowed),
            rating_distribution: rating_distribution(&windowed),
            status_breakdown: status_breakdown(&windowed),
            subject_breakdown: subject_breakdown(&windowed),
            response_rate: response_rate(&windowed),
            trends: daily_trends(&windowed, &window),
            recent_feedback,
        },
    }))
}

/// GET /feedback/dashboard-stats — Dashboard cards for either role.
#[utoipa::path(
    get,
    path = "/feedback/dashboard-stats",
    params(RangeQuery),
    responses(
        (status = 200, description = "Dashboard cards over the caller's scope", body = DashboardResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
    ),
    tag = "analytics"
)]
pub(crate) async fn dashboard_stats(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<RangeQuery>,
) -> Json<DashboardResponse> {
    let actor = user.actor();
    let window = query.range().window_ending(Utc::now());
    let prior_window = window.preceding();

    let records = scoped_records(&state, &Scope::for_actor(&actor));
    let all_refs: Vec<&Feedback> = records.iter().collect();
    let current = in_window(&records, &window);
    let prior = in_window(&records, &prior_window);

    let breakdown = status_breakdown(&all_refs);
    let current_avg = average_rating(&current);
    let current_rr = response_rate(&current);

    let mut newest: Vec<&Feedback> = all_refs.clone();
    newest.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let recent_activity: Vec<ActivityItem> = newest
        .iter()
        .take(5)
        .map(|r| ActivityItem {
            id: r.id,
            description: activity_line(r, &state),
            date: r.created_at,
        })
        .collect();

    Json(DashboardResponse {
        success: true,
        data: DashboardData {
            total_feedback: all_refs.len() as u64,
            average_rating: current_avg,
            pending: breakdown.pending,
            reviewed: breakdown.reviewed,
            total_users: state.users.len() as u64,
            response_rate: current_rr,
            feedback_growth: growth_percent(current.len() as u64, prior.len() as u64),
            rating_change: change_percent(current_avg, average_rating(&prior)),
            response_rate_change: change_percent(current_rr, response_rate(&prior)),
            recent_activity,
        },
    })
}

/// Activity-feed line for one record. Anonymous submissions name no
/// student, for every viewer.
fn activity_line(record: &Feedback, state: &AppState) -> String {
    let subject = record.subject.as_str();
    if record.is_anonymous {
        return format!("A student submitted feedback on {subject}");
    }
    match state.users.get(&record.student_id) {
        Some(author) => format!("{} submitted feedback on {subject}", author.full_name()),
        None => format!("A student submitted feedback on {subject}"),
    }
}
