//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service.

use anon_journal_core::{AccountError, PortError, RecoveryError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::config::ConfigError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// An error from one of the account recovery steps.
    #[error("Recovery error: {0}")]
    Recovery(#[from] RecoveryError),

    /// An error from signup or login.
    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents an error while running database migrations.
    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl ApiError {
    /// Status code and the message that is safe to show the client.
    fn public_parts(&self) -> (StatusCode, String) {
        match self {
            ApiError::Recovery(RecoveryError::Validation(msg))
            | ApiError::Account(AccountError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            ApiError::Recovery(RecoveryError::NotFound) => {
                (StatusCode::NOT_FOUND, "User not found.".to_string())
            }
            ApiError::Recovery(RecoveryError::InvalidToken) => (
                StatusCode::UNAUTHORIZED,
                "Recovery token is missing or invalid.".to_string(),
            ),
            ApiError::Account(AccountError::InvalidCredentials) => (
                StatusCode::UNAUTHORIZED,
                "Invalid username or password.".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred.".to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.public_parts();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}
