//! User persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `users` table.
//! Uniqueness of username and email is enforced both here (UNIQUE
//! constraints) and at the application layer before any write.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use pulse_core::{Role, User};

/// Insert a new user record.
pub async fn insert(pool: &PgPool, user: &User) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO users (id, username, email, password_hash, role, first_name, last_name,
                            student_id, year_of_study, department, is_active,
                            reset_token_hash, reset_token_expires, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role.as_str())
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.student_id)
    .bind(user.year_of_study.map(i16::from))
    .bind(&user.department)
    .bind(user.is_active)
    .bind(&user.reset_token_hash)
    .bind(user.reset_token_expires)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Update every mutable field of a user record.
pub async fn update(pool: &PgPool, user: &User) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE users SET email = $1, password_hash = $2, first_name = $3, last_name = $4,
                          student_id = $5, year_of_study = $6, department = $7, is_active = $8,
                          reset_token_hash = $9, reset_token_expires = $10, updated_at = $11
         WHERE id = $12",
    )
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.student_id)
    .bind(user.year_of_study.map(i16::from))
    .bind(&user.department)
    .bind(user.is_active)
    .bind(&user.reset_token_hash)
    .bind(user.reset_token_expires)
    .bind(user.updated_at)
    .bind(user.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all users into the in-memory store on startup.
///
/// Rows with an unknown role are skipped with an error log rather than
/// corrupting the store with a guessed role.
pub async fn load_all(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    let rows = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, email, password_hash, role, first_name, last_name,
                student_id, year_of_study, department, is_active,
                reset_token_hash, reset_token_expires, created_at, updated_at
         FROM users ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().filter_map(UserRow::into_user).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    first_name: String,
    last_name: String,
    student_id: Option<String>,
    year_of_study: Option<i16>,
    department: Option<String>,
    is_active: bool,
    reset_token_hash: Option<String>,
    reset_token_expires: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Option<User> {
        let Some(role) = Role::parse(&self.role) else {
            tracing::error!(
                id = %self.id,
                role = %self.role,
                "unknown role in users table — skipping row; investigate for data corruption"
            );
            return None;
        };

        Some(User {
            id: self.id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            role,
            first_name: self.first_name,
            last_name: self.last_name,
            student_id: self.student_id,
            year_of_study: self.year_of_study.and_then(|y| u8::try_from(y).ok()),
            department: self.department,
            is_active: self.is_active,
            reset_token_hash: self.reset_token_hash,
            reset_token_expires: self.reset_token_expires,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
