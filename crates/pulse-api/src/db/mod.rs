//! # Database Persistence
//!
//! Optional Postgres mirror for the in-memory stores. The stores are
//! authoritative for reads; every successful write is mirrored here so
//! a restart can hydrate from `load_all`. Absent `DATABASE_URL`, the
//! service runs entirely in memory.

use std::future::Future;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::state::AppConfig;

pub mod feedback;
pub mod users;

/// Attempts for a transient write before giving up.
const RETRY_ATTEMPTS: u32 = 3;

/// Initialize the connection pool from configuration.
///
/// Returns `Ok(None)` when no database is configured.
pub async fn init_pool(config: &AppConfig) -> Result<Option<PgPool>, sqlx::Error> {
    let Some(url) = &config.database_url else {
        tracing::info!("DATABASE_URL not set — running in-memory only");
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(url)
        .await?;

    ensure_schema(&pool).await?;
    tracing::info!("database connected and schema ensured");
    Ok(Some(pool))
}

/// Create the tables if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            student_id TEXT,
            year_of_study SMALLINT,
            department TEXT,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            reset_token_hash TEXT,
            reset_token_expires TIMESTAMPTZ,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS feedback (
            id UUID PRIMARY KEY,
            student_id UUID NOT NULL,
            teacher_id UUID NOT NULL,
            subject TEXT NOT NULL,
            content TEXT NOT NULL,
            rating SMALLINT NOT NULL,
            semester SMALLINT NOT NULL,
            academic_year TEXT NOT NULL,
            is_anonymous BOOLEAN NOT NULL DEFAULT FALSE,
            status TEXT NOT NULL,
            teacher_response TEXT,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Run a persistence operation with bounded retry and exponential
/// backoff. Transient connection blips should not lose a mirror write.
pub async fn with_retry<T, F, Fut>(op_name: &str, mut op: F) -> Result<T, sqlx::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    let mut delay = Duration::from_millis(100);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < RETRY_ATTEMPTS => {
                tracing::warn!(
                    operation = op_name,
                    attempt,
                    error = %err,
                    "database operation failed, retrying"
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            Err(err) => {
                tracing::error!(
                    operation = op_name,
                    attempts = attempt,
                    error = %err,
                    "database operation failed after retries"
                );
                return Err(err);
            }
        }
    }
}
