use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::provider::{ProviderError, ProviderErrorKind};

/// Maximum number of characters of raw provider output carried in a
/// `MalformedGeneration` message. Never the full payload.
pub const EXCERPT_LEN: usize = 160;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Provider error: {0}")]
    Provider(ProviderError),

    #[error("Malformed generation output: {excerpt}")]
    MalformedGeneration { excerpt: String },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// Builds a `MalformedGeneration` from raw provider text, keeping only a
    /// truncated excerpt for diagnosis.
    pub fn malformed_generation(raw: &str) -> Self {
        AppError::MalformedGeneration {
            excerpt: truncate_chars(raw.trim(), EXCERPT_LEN),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Provider(_) => "PROVIDER_ERROR",
            AppError::MalformedGeneration { .. } => "MALFORMED_GENERATION",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show to the client. Provider authentication failures
    /// are rewritten so upstream key material or transport detail never leaks.
    fn user_message(&self) -> String {
        match self {
            AppError::Provider(err) if err.kind == ProviderErrorKind::AuthenticationFailed => {
                "Provider error: the configured provider API key is invalid or expired".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max).collect();
        format!("{}...", head)
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::MalformedGeneration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        log::debug!("responding with {}: {}", self.error_code(), self);
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.user_message(),
            code: self.status_code().as_u16(),
        })
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::Provider(err)
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
