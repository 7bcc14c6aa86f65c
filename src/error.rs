//! Error types for the ILMS server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Numeric error codes surfaced to API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    DbFailure = 2,
    NotFound = 3,
    Duplicate = 4,
    BadValue = 5,
    BadIdentifier = 6,
    NoCopyAvailable = 7,
    AlreadyReturned = 8,
    BookReferenced = 9,
    NotAuthorized = 10,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("No copies of book {0} are available")]
    BookUnavailable(i64),

    #[error("Loan {0} has already been returned")]
    AlreadyReturned(i64),

    #[error("Book {0} has copies out on loan")]
    ReferentialIntegrity(i64),

    #[error("Invalid username or password")]
    AuthenticationFailed,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(errors.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NotFound, msg.clone()),
            AppError::DuplicateKey(msg) => {
                (StatusCode::CONFLICT, ErrorCode::Duplicate, msg.clone())
            }
            AppError::InvalidInput(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::InvalidIdentifier(_) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::BadIdentifier,
                self.to_string(),
            ),
            AppError::BookUnavailable(_) => (
                StatusCode::CONFLICT,
                ErrorCode::NoCopyAvailable,
                self.to_string(),
            ),
            AppError::AlreadyReturned(_) => (
                StatusCode::CONFLICT,
                ErrorCode::AlreadyReturned,
                self.to_string(),
            ),
            AppError::ReferentialIntegrity(_) => (
                StatusCode::CONFLICT,
                ErrorCode::BookReferenced,
                self.to_string(),
            ),
            AppError::AuthenticationFailed => (
                StatusCode::UNAUTHORIZED,
                ErrorCode::NotAuthorized,
                self.to_string(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
