//! Board Error Types
//!
//! Board-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Board-specific result type alias
pub type BoardResult<T> = Result<T, BoardError>;

/// Board-specific error variants
#[derive(Debug, Error)]
pub enum BoardError {
    /// Post does not exist
    #[error("Post not found")]
    PostNotFound,

    /// Input validation failed
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Non-database storage failure (in-memory store)
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BoardError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            BoardError::PostNotFound => StatusCode::NOT_FOUND,
            BoardError::Validation(_) => StatusCode::BAD_REQUEST,
            BoardError::Database(_) | BoardError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            BoardError::PostNotFound => ErrorKind::NotFound,
            BoardError::Validation(_) => ErrorKind::BadRequest,
            BoardError::Database(_) | BoardError::Storage(_) => ErrorKind::InternalServerError,
        }
    }

    /// Classify a failed write that references a post
    pub fn from_post_write(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                BoardError::PostNotFound
            }
            _ => BoardError::Database(err),
        }
    }

    /// Convert to AppError. Server-side details stay in the log.
    pub fn to_app_error(&self) -> AppError {
        let kind = self.kind();
        if kind.is_server_error() {
            AppError::new(kind, "Internal server error")
        } else {
            AppError::new(kind, self.to_string())
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            BoardError::Database(e) => {
                tracing::error!(error = %e, "Board database error");
            }
            BoardError::Storage(msg) => {
                tracing::error!(message = %msg, "Board storage error");
            }
            _ => {
                tracing::debug!(error = %self, "Board error");
            }
        }
    }
}

impl IntoResponse for BoardError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<BoardError> for AppError {
    fn from(err: BoardError) -> Self {
        err.to_app_error()
    }
}
