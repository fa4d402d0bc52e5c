//! # Account & Session API
//!
//! Registration, login, profile and password management, password
//! reset, and the teacher directory.
//!
//! ## Endpoints
//!
//! Public:
//! - `POST /auth/register` — create an account, returns a session token
//! - `POST /auth/login` — exchange credentials for a session token
//! - `POST /auth/forgotpassword` — request a reset token
//! - `PUT /auth/resetpassword/:token` — redeem a reset token
//!
//! Authenticated:
//! - `GET /auth/me` — current account
//! - `PUT /auth/update-profile` — names and email
//! - `PUT /auth/updatepassword` — rotate password, returns a fresh token
//! - `GET /auth/teachers` — directory for the submission form

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use pulse_auth::{hash_password, mint_reset_token, verify_password, MIN_PASSWORD_LEN};
use pulse_core::{Role, User};

use crate::auth::CurrentUser;
use crate::db;
use crate::error::AppError;
use crate::extractors::{extract_json, extract_validated_json, Validate};
use crate::routes::MessageBody;
use crate::state::AppState;

// ── Request/Response DTOs ───────────────────────────────────────────

/// Minimal shape check; real deliverability is the mailer's problem.
fn email_is_well_formed(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Request to register a new account.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Unique login name, 3–30 characters.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Plaintext password, at least 6 characters.
    pub password: String,
    /// `student` or `teacher`.
    #[schema(value_type = String)]
    pub role: Role,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Required for students.
    pub student_id: Option<String>,
    /// Year of study, required for students.
    #[serde(rename = "academicYear")]
    pub academic_year: Option<u8>,
    /// Required for teachers.
    pub department: Option<String>,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), String> {
        let username_len = self.username.chars().count();
        if !(3..=30).contains(&username_len) {
            return Err("username must be between 3 and 30 characters".to_string());
        }
        if !email_is_well_formed(&self.email) {
            return Err("email address is not valid".to_string());
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(format!("password must be at least {MIN_PASSWORD_LEN} characters"));
        }
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err("first and last name must not be empty".to_string());
        }
        match self.role {
            Role::Student => {
                if self.student_id.as_deref().map_or(true, |s| s.trim().is_empty()) {
                    return Err("studentId is required for students".to_string());
                }
                match self.academic_year {
                    Some(1..=8) => {}
                    _ => return Err("academicYear must be between 1 and 8".to_string()),
                }
            }
            Role::Teacher => {
                if self.department.as_deref().map_or(true, |s| s.trim().is_empty()) {
                    return Err("department is required for teachers".to_string());
                }
            }
        }
        Ok(())
    }
}

/// Request to log in.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), String> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err("email and password are required".to_string());
        }
        Ok(())
    }
}

/// Request to update names and/or email.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New email address; uniqueness is re-checked.
    pub email: Option<String>,
}

impl Validate for UpdateProfileRequest {
    fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.first_name {
            if name.trim().is_empty() {
                return Err("firstName must not be empty if provided".to_string());
            }
        }
        if let Some(name) = &self.last_name {
            if name.trim().is_empty() {
                return Err("lastName must not be empty if provided".to_string());
            }
        }
        if let Some(email) = &self.email {
            if !email_is_well_formed(email) {
                return Err("email address is not valid".to_string());
            }
        }
        Ok(())
    }
}

/// Request to rotate the password.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    /// The password currently on file.
    pub current_password: String,
    /// The replacement password.
    pub new_password: String,
}

/// Request to start a password reset.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ForgotPasswordRequest {
    /// Account email; the response is identical whether or not it
    /// exists.
    pub email: String,
}

/// Request to finish a password reset.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ResetPasswordRequest {
    /// The replacement password.
    pub password: String,
}

/// Sanitized account representation. Never carries the password hash
/// or reset-token fields.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    /// Account id.
    pub id: Uuid,
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Account role.
    #[schema(value_type = String)]
    pub role: Role,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Institutional student number, students only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    /// Year of study, students only.
    #[serde(rename = "academicYear", skip_serializing_if = "Option::is_none")]
    pub academic_year: Option<u8>,
    /// Department, teachers only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Whether the account can authenticate.
    pub is_active: bool,
    /// Registration timestamp.
    pub created_at: chrono::DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            student_id: user.student_id.clone(),
            academic_year: user.year_of_study,
            department: user.department.clone(),
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// Response for endpoints that issue a session token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Always `true`.
    pub success: bool,
    /// Signed session token.
    pub token: String,
    /// The account the token belongs to.
    pub user: UserView,
}

/// Response wrapping a single account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// Always `true`.
    pub success: bool,
    /// The account.
    pub data: UserView,
}

/// One entry in the teacher directory.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherView {
    /// Account id, used as the feedback target.
    pub id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Department.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// Response wrapping the teacher directory.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TeachersResponse {
    /// Always `true`.
    pub success: bool,
    /// Number of entries.
    pub count: usize,
    /// The directory, sorted by first name.
    pub data: Vec<TeacherView>,
}

// ── Routers ─────────────────────────────────────────────────────────

/// Endpoints reachable without a session token.
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/forgotpassword", post(forgot_password))
        .route("/auth/resetpassword/:token", put(reset_password))
}

/// Endpoints mounted behind the auth middleware.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(me))
        .route("/auth/update-profile", put(update_profile))
        .route("/auth/updatepassword", put(update_password))
        .route("/auth/teachers", get(list_teachers))
}

// ── Handlers ────────────────────────────────────────────────────────

fn token_response(state: &AppState, user: &User) -> Result<TokenResponse, AppError> {
    let token = state
        .token_keys
        .issue(user.id, user.role, Utc::now())
        .map_err(AppError::from)?;
    Ok(TokenResponse { success: true, token, user: UserView::from(user) })
}

async fn mirror_user_insert(state: &AppState, user: &User) {
    if let Some(pool) = &state.db_pool {
        // Failures are logged inside with_retry; memory stays authoritative.
        let _ = db::with_retry("users.insert", || db::users::insert(pool, user)).await;
    }
}

async fn mirror_user_update(state: &AppState, user: &User) {
    if let Some(pool) = &state.db_pool {
        let _ = db::with_retry("users.update", || db::users::update(pool, user)).await;
    }
}

/// POST /auth/register — Create an account.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = TokenResponse),
        (status = 400, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "auth"
)]
pub(crate) async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let req = extract_validated_json(body)?;
    let email = req.email.to_ascii_lowercase();

    if state.find_user_by_email(&email).is_some() {
        return Err(AppError::Validation("email is already registered".to_string()));
    }
    if state.find_user_by_username(&req.username).is_some() {
        return Err(AppError::Validation("username is already taken".to_string()));
    }

    let password_hash = hash_password(&req.password)?;
    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        username: req.username,
        email,
        password_hash,
        role: req.role,
        first_name: req.first_name,
        last_name: req.last_name,
        student_id: if req.role == Role::Student { req.student_id } else { None },
        year_of_study: if req.role == Role::Student { req.academic_year } else { None },
        department: if req.role == Role::Teacher { req.department } else { None },
        is_active: true,
        reset_token_hash: None,
        reset_token_expires: None,
        created_at: now,
        updated_at: now,
    };

    state.users.insert(user.id, user.clone());
    mirror_user_insert(&state, &user).await;
    tracing::info!(user_id = %user.id, role = %user.role, "account registered");

    Ok((StatusCode::CREATED, Json(token_response(&state, &user)?)))
}

/// POST /auth/login — Exchange credentials for a session token.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorBody),
    ),
    tag = "auth"
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let req = extract_validated_json(body)?;

    // Same message for unknown email and wrong password.
    let user = state
        .find_user_by_email(&req.email)
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;
    verify_password(&req.password, &user.password_hash)?;

    if !user.is_active {
        return Err(AppError::Unauthorized("User account is deactivated".to_string()));
    }

    tracing::info!(user_id = %user.id, "login");
    Ok(Json(token_response(&state, &user)?))
}

/// GET /auth/me — The authenticated account.
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current account", body = UserResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
    ),
    tag = "auth"
)]
pub(crate) async fn me(user: CurrentUser) -> Json<UserResponse> {
    Json(UserResponse { success: true, data: UserView::from(&user.0) })
}

/// PUT /auth/update-profile — Update names and email.
#[utoipa::path(
    put,
    path = "/auth/update-profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "auth"
)]
pub(crate) async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    body: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, AppError> {
    let req = extract_validated_json(body)?;

    let new_email = req.email.map(|e| e.to_ascii_lowercase());
    if let Some(email) = &new_email {
        if let Some(existing) = state.find_user_by_email(email) {
            if existing.id != user.0.id {
                return Err(AppError::Validation("email is already registered".to_string()));
            }
        }
    }

    let updated = state
        .users
        .update(&user.0.id, |u| {
            if let Some(name) = req.first_name {
                u.first_name = name;
            }
            if let Some(name) = req.last_name {
                u.last_name = name;
            }
            if let Some(email) = new_email {
                u.email = email;
            }
            u.updated_at = Utc::now();
        })
        .ok_or_else(|| AppError::NotFound("account not found".to_string()))?;

    mirror_user_update(&state, &updated).await;
    Ok(Json(UserResponse { success: true, data: UserView::from(&updated) }))
}

/// PUT /auth/updatepassword — Rotate the password.
#[utoipa::path(
    put,
    path = "/auth/updatepassword",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password updated, fresh token issued", body = TokenResponse),
        (status = 401, description = "Current password mismatch", body = crate::error::ErrorBody),
    ),
    tag = "auth"
)]
pub(crate) async fn update_password(
    State(state): State<AppState>,
    user: CurrentUser,
    body: Result<Json<UpdatePasswordRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let req = extract_json(body)?;

    verify_password(&req.current_password, &user.0.password_hash)?;
    let new_hash = hash_password(&req.new_password)?;

    let updated = state
        .users
        .update(&user.0.id, |u| {
            u.password_hash = new_hash;
            u.updated_at = Utc::now();
        })
        .ok_or_else(|| AppError::NotFound("account not found".to_string()))?;

    mirror_user_update(&state, &updated).await;
    tracing::info!(user_id = %updated.id, "password rotated");
    Ok(Json(token_response(&state, &updated)?))
}

/// POST /auth/forgotpassword — Start a password reset.
#[utoipa::path(
    post,
    path = "/auth/forgotpassword",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Uniform acknowledgement", body = MessageBody),
    ),
    tag = "auth"
)]
pub(crate) async fn forgot_password(
    State(state): State<AppState>,
    body: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> Result<Json<MessageBody>, AppError> {
    let req = extract_json(body)?;

    // The response never reveals whether the email exists.
    if let Some(user) = state.find_user_by_email(&req.email) {
        let (_plaintext, digest) = mint_reset_token();
        let expires = Utc::now() + Duration::minutes(state.config.reset_token_ttl_mins);
        let updated = state.users.update(&user.id, |u| {
            u.reset_token_hash = Some(digest.clone());
            u.reset_token_expires = Some(expires);
            u.updated_at = Utc::now();
        });
        if let Some(updated) = updated {
            mirror_user_update(&state, &updated).await;
        }
        // The plaintext token goes out through the mailer, not the API.
        tracing::info!(user_id = %user.id, "password reset token issued");
    }

    Ok(Json(MessageBody::new("If that email is registered, a reset link has been sent")))
}

/// PUT /auth/resetpassword/:token — Redeem a reset token.
#[utoipa::path(
    put,
    path = "/auth/resetpassword/{token}",
    params(("token" = String, Path, description = "Reset token from the email")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset, fresh token issued", body = TokenResponse),
        (status = 400, description = "Invalid or expired reset token", body = crate::error::ErrorBody),
    ),
    tag = "auth"
)]
pub(crate) async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    body: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let req = extract_json(body)?;

    let user = state
        .find_user_by_reset_token(&token)
        .filter(|u| u.has_live_reset_token(Utc::now()))
        .ok_or_else(|| AppError::Validation("Invalid or expired reset token".to_string()))?;

    let new_hash = hash_password(&req.password)?;
    let updated = state
        .users
        .update(&user.id, |u| {
            u.password_hash = new_hash;
            u.clear_reset_token();
            u.updated_at = Utc::now();
        })
        .ok_or_else(|| AppError::NotFound("account not found".to_string()))?;

    mirror_user_update(&state, &updated).await;
    tracing::info!(user_id = %updated.id, "password reset redeemed");
    Ok(Json(token_response(&state, &updated)?))
}

/// GET /auth/teachers — Directory of active teachers.
#[utoipa::path(
    get,
    path = "/auth/teachers",
    responses(
        (status = 200, description = "Teacher directory", body = TeachersResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
    ),
    tag = "auth"
)]
pub(crate) async fn list_teachers(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Json<TeachersResponse> {
    let mut teachers = state.active_teachers();
    teachers.sort_by(|a, b| a.first_name.cmp(&b.first_name).then_with(|| a.last_name.cmp(&b.last_name)));
    let data: Vec<TeacherView> = teachers
        .iter()
        .map(|t| TeacherView {
            id: t.id,
            first_name: t.first_name.clone(),
            last_name: t.last_name.clone(),
            department: t.department.clone(),
        })
        .collect();
    Json(TeachersResponse { success: true, count: data.len(), data })
}
