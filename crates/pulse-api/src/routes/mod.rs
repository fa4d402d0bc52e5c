//! Route modules for the API surface.
//!
//! Wire DTOs are camelCase; domain types stay out of response bodies
//! and are mapped through the view structs each module defines.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod analytics;
pub mod auth;
pub mod feedback;

/// Success envelope for endpoints that only confirm an action.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageBody {
    /// Always `true`.
    pub success: bool,
    /// Confirmation text.
    pub message: String,
}

impl MessageBody {
    /// Build the envelope for a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }
}
