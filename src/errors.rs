//! Centralized error handling.
//!
//! Two families: [`ConfigError`] aborts startup and is never retried,
//! [`AppError`] is raised while serving a request and turns into an
//! HTML response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::handlers::{HANDLER_404, HANDLER_500};
use crate::api::pages;

/// Startup-time configuration contradictions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DEBUG=true but RENDER is set. Refusing to run.")]
    DebugWithHostingProvider,

    #[error("DEBUG=true but DATABASE_URL is set. Refusing to run.")]
    DebugWithDatabaseUrl,

    #[error("EMAIL_USE_TLS and EMAIL_USE_SSL are mutually exclusive")]
    ConflictingEmailSecurity,

    #[error("DJANGO_SECRET_KEY must be set when DEBUG is off")]
    MissingSecretKey,

    #[error("DJANGO_SECRET_KEY must be at least {min} characters long")]
    SecretKeyTooShort { min: usize },

    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub fn invalid(key: &str, value: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Request-time errors.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Page not found")]
    NotFound,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(String),

    // External service errors
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Mail delivery error: {0}")]
    Mail(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_)
            | AppError::Mail(_)
            | AppError::Config(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn mail(msg: impl Into<String>) -> Self {
        AppError::Mail(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => HANDLER_404(),
            AppError::Forbidden(reason) => {
                tracing::warn!(%reason, "Request rejected");
                pages::error_page(StatusCode::FORBIDDEN, "Forbidden", "403 Forbidden")
            }
            AppError::BadRequest(reason) => {
                tracing::warn!(%reason, "Bad request");
                pages::error_page(StatusCode::BAD_REQUEST, "Bad Request", "400 Bad Request")
            }
            AppError::Validation(msg) => {
                pages::error_page(StatusCode::BAD_REQUEST, "Invalid submission", &msg)
            }
            // Hide details for internal errors
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                HANDLER_500()
            }
            AppError::Mail(msg) => {
                tracing::error!("Mail error: {}", msg);
                HANDLER_500()
            }
            AppError::Config(e) => {
                tracing::error!("Configuration error: {}", e);
                HANDLER_500()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                HANDLER_500()
            }
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;
