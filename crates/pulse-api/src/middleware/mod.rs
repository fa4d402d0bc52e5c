//! Tower-style middleware for the API: request metrics and rate
//! limiting. Tracing is handled by `tower_http::trace::TraceLayer` at
//! router assembly.

pub mod metrics;
pub mod rate_limit;
