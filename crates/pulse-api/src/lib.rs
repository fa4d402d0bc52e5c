//! # pulse-api — Axum API for the Pulse Feedback Platform
//!
//! Pulse lets students rate their teachers per subject and semester,
//! and lets teachers review, respond to, and triage what they receive.
//! This crate is the HTTP layer: routing, authentication, request
//! validation, and response shaping. The domain rules live in
//! `pulse-core`, aggregation in `pulse-analytics`, and credential
//! handling in `pulse-auth`.
//!
//! ## API Surface
//!
//! | Prefix                      | Module                  | Domain                  |
//! |-----------------------------|-------------------------|-------------------------|
//! | `/auth/*`                   | [`routes::auth`]        | Accounts & sessions     |
//! | `/feedback`, `/feedback/:id`| [`routes::feedback`]    | Feedback CRUD & triage  |
//! | `/feedback/stats` etc.      | [`routes::analytics`]   | Aggregates & dashboards |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → RateLimitMiddleware → AuthMiddleware → Handler
//! ```
//!
//! Register, login, password reset, `/health`, and `/openapi.json` are
//! mounted outside the auth middleware.

pub mod auth;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::auth::AuthContext;
use crate::middleware::metrics::ApiMetrics;
use crate::middleware::rate_limit::{RateLimitConfig, RateLimiter};
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let ctx = AuthContext { keys: state.token_keys.clone(), users: state.users.clone() };
    let metrics = ApiMetrics::new();
    let limiter = RateLimiter::new(RateLimitConfig::default());

    // Everything behind the session check. Static segments such as
    // /feedback/stats are matched before the /feedback/:id wildcard.
    let protected = Router::new()
        .merge(routes::auth::router())
        .merge(routes::feedback::router())
        .merge(routes::analytics::router())
        .layer(from_fn(auth::auth_middleware));

    // Reachable without credentials.
    let public = Router::new()
        .merge(routes::auth::public_router())
        .merge(openapi::router())
        .route("/health", get(health));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(from_fn(middleware::rate_limit::rate_limit_middleware))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(ctx))
        .layer(axum::Extension(metrics))
        .layer(axum::Extension(limiter))
        .with_state(state)
}

/// Liveness probe — 200 whenever the process is serving.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
