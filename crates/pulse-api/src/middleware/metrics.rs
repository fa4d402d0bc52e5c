//! # Request Metrics
//!
//! In-process counters split by API surface, so a glance at the numbers
//! says whether traffic is account activity or feedback activity and
//! how much of it the auth/policy layer is turning away.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;

/// Which part of the API a request touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Surface {
    /// `/auth/*`: registration, sessions, profile, password reset.
    Auth,
    /// `/feedback*`: record CRUD plus the stats/analytics/dashboard reads.
    Feedback,
    /// Health, OpenAPI, and anything unrouted.
    Other,
}

impl Surface {
    fn of(path: &str) -> Self {
        if path == "/auth" || path.starts_with("/auth/") {
            Surface::Auth
        } else if path == "/feedback" || path.starts_with("/feedback/") {
            Surface::Feedback
        } else {
            Surface::Other
        }
    }
}

/// Shared counters, handed to every request via an `Extension`.
#[derive(Debug, Clone, Default)]
pub struct ApiMetrics {
    /// Total requests served.
    pub request_count: Arc<AtomicU64>,
    /// Requests that ended in a 4xx or 5xx.
    pub error_count: Arc<AtomicU64>,
    /// Requests turned away with 401/403 (bad tokens, policy denials).
    pub denied_count: Arc<AtomicU64>,
    /// Requests against the account surface.
    pub auth_count: Arc<AtomicU64>,
    /// Requests against the feedback surface, analytics included.
    pub feedback_count: Arc<AtomicU64>,
}

impl ApiMetrics {
    /// Create a new metrics instance with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total requests served.
    pub fn requests(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Requests that ended in an error status.
    pub fn errors(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Requests rejected by the auth or policy layer.
    pub fn denied(&self) -> u64 {
        self.denied_count.load(Ordering::Relaxed)
    }

    /// Requests against `/auth/*`.
    pub fn auth_requests(&self) -> u64 {
        self.auth_count.load(Ordering::Relaxed)
    }

    /// Requests against the feedback and analytics endpoints.
    pub fn feedback_requests(&self) -> u64 {
        self.feedback_count.load(Ordering::Relaxed)
    }
}

/// Middleware that tallies each request under its surface and outcome.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();
    let surface = Surface::of(request.uri().path());

    let response = next.run(request).await;

    if let Some(m) = metrics {
        m.request_count.fetch_add(1, Ordering::Relaxed);
        match surface {
            Surface::Auth => m.auth_count.fetch_add(1, Ordering::Relaxed),
            Surface::Feedback => m.feedback_count.fetch_add(1, Ordering::Relaxed),
            Surface::Other => 0,
        };
        let status = response.status();
        if status.is_server_error() || status.is_client_error() {
            m.error_count.fetch_add(1, Ordering::Relaxed);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            m.denied_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn instrumented(metrics: &ApiMetrics) -> Router {
        Router::new()
            .route("/health", get(|| async { "ok" }))
            .route("/auth/me", get(|| async { StatusCode::UNAUTHORIZED }))
            .route("/feedback", get(|| async { StatusCode::BAD_REQUEST }))
            .layer(from_fn(metrics_middleware))
            .layer(axum::Extension(metrics.clone()))
    }

    async fn hit(app: &Router, uri: &str) {
        let request = HttpRequest::builder().uri(uri).body(Body::empty()).unwrap();
        app.clone().oneshot(request).await.unwrap();
    }

    #[tokio::test]
    async fn counters_split_by_surface_and_outcome() {
        let metrics = ApiMetrics::new();
        let app = instrumented(&metrics);

        hit(&app, "/health").await;
        hit(&app, "/auth/me").await;
        hit(&app, "/feedback").await;

        assert_eq!(metrics.requests(), 3);
        assert_eq!(metrics.auth_requests(), 1);
        assert_eq!(metrics.feedback_requests(), 1);
        assert_eq!(metrics.errors(), 2);
        assert_eq!(metrics.denied(), 1);
    }

    #[test]
    fn surface_classification_covers_nested_paths() {
        assert_eq!(Surface::of("/auth/resetpassword/abc123"), Surface::Auth);
        assert_eq!(Surface::of("/feedback/dashboard-stats"), Surface::Feedback);
        assert_eq!(Surface::of("/feedback"), Surface::Feedback);
        assert_eq!(Surface::of("/openapi.json"), Surface::Other);
        assert_eq!(Surface::of("/authx"), Surface::Other);
    }
}
