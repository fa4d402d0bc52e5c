//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from pulse-core and pulse-auth to HTTP status
//! codes. Every error response uses the `{ "success": false,
//! "message": ... }` envelope. Internal error details are never exposed
//! to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use pulse_auth::AuthError;
use pulse_core::{Denial, LifecycleError, ValidationError};

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// Human-readable explanation.
    pub message: String,
}

impl ErrorBody {
    /// Build the envelope for a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }
}

/// Application-level error type that implements [`IntoResponse`].
#[derive(Error, Debug)]
pub enum AppError {
    /// Request failed validation, including malformed JSON bodies (400).
    #[error("{0}")]
    Validation(String),

    /// Missing, invalid, or expired credentials (401).
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not permitted (403). Never masquerades as 404.
    #[error("{0}")]
    Forbidden(String),

    /// Resource not found (404).
    #[error("{0}")]
    NotFound(String),

    /// Internal server error (500). Message is logged, not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => {
                tracing::error!(error = %self, "internal server error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorBody::new(message))).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Lifecycle failures map per the edit rules: a closed window or a
/// non-pending record is a permission problem for the caller (403), a
/// bad field or an impossible status jump is a validation problem (400).
impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match &err {
            LifecycleError::NotPending(_) | LifecycleError::EditWindowClosed { .. } => {
                Self::Forbidden(err.to_string())
            }
            LifecycleError::InvalidTransition { .. } | LifecycleError::Validation(_) => {
                Self::Validation(err.to_string())
            }
        }
    }
}

impl From<Denial> for AppError {
    fn from(err: Denial) -> Self {
        Self::Forbidden(err.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match &err {
            AuthError::InvalidCredentials => Self::Unauthorized("Invalid credentials".to_string()),
            AuthError::AccountDisabled => {
                Self::Unauthorized("User account is deactivated".to_string())
            }
            AuthError::TokenInvalid => {
                Self::Unauthorized("Not authorized to access this route".to_string())
            }
            AuthError::PasswordTooShort(_) => Self::Validation(err.to_string()),
            AuthError::Hash(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(err.to_string())
    }
}
