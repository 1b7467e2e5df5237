//! Error types and error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Result alias used throughout the crate
pub type ProfilesResult<T> = Result<T, ProfilesError>;

/// Crate error type
#[derive(Debug, Error)]
pub enum ProfilesError {
    /// The profile model setting is missing or names no registered model
    #[error("Profile model not available: {0}")]
    ProfileNotAvailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Not Found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// A profile already exists for the user
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A form was saved before it validated
    #[error("Form error: {0}")]
    Form(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Database migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Template lookup or rendering error
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl ProfilesError {
    /// HTTP status this error maps to
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProfilesError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "profile request failed");
        } else {
            tracing::debug!(error = %self, "profile request rejected");
        }

        let message = status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string();

        (status, message).into_response()
    }
}
