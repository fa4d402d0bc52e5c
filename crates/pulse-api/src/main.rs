//! # pulse-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the Pulse feedback platform.
//! Binds to a configurable port (default 5000).

use pulse_api::state::{AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Build configuration from environment.
    let defaults = AppConfig::default();
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(defaults.port);
    let jwt_secret = match std::env::var("JWT_SECRET") {
        Ok(secret) if !secret.is_empty() => secret,
        _ => {
            tracing::warn!("JWT_SECRET not set — using the development default secret");
            defaults.jwt_secret.clone()
        }
    };
    let reset_token_ttl_mins = std::env::var("RESET_TOKEN_TTL_MINS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.reset_token_ttl_mins);
    let database_url = std::env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

    let config = AppConfig { port, jwt_secret, reset_token_ttl_mins, database_url };

    // Initialize database pool (optional — absent means in-memory only).
    let db_pool = pulse_api::db::init_pool(&config).await.map_err(|e| {
        tracing::error!("Database initialization failed: {e}");
        e
    })?;

    let state = AppState::with_config(config, db_pool);

    // Hydrate in-memory stores from database (if connected).
    state.hydrate_from_db().await.map_err(|e| {
        tracing::error!("Database hydration failed: {e}");
        e
    })?;

    let app = pulse_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Pulse API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
