//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::PasswordHashError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password. Never says which.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Credentials were correct but the account is not activated
    #[error("Account is not active")]
    AccountNotActive,

    /// Email already registered
    #[error("Email is already registered")]
    DuplicateEmail,

    /// Session not found, expired or forged
    #[error("Session not found or expired")]
    SessionInvalid,

    /// Input validation failed
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Password hashing failed
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// Stored password hash could not be verified
    #[error("Password verification failed: {0}")]
    Verification(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Non-database storage failure (in-memory store, serialization)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials | AuthError::SessionInvalid => StatusCode::UNAUTHORIZED,
            AuthError::AccountNotActive => StatusCode::FORBIDDEN,
            AuthError::DuplicateEmail => StatusCode::CONFLICT,
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Hashing(_)
            | AuthError::Verification(_)
            | AuthError::Database(_)
            | AuthError::Storage(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials | AuthError::SessionInvalid => ErrorKind::Unauthorized,
            AuthError::AccountNotActive => ErrorKind::Forbidden,
            AuthError::DuplicateEmail => ErrorKind::Conflict,
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::Hashing(_)
            | AuthError::Verification(_)
            | AuthError::Database(_)
            | AuthError::Storage(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Classify a failed INSERT into `users`
    pub fn from_user_insert(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AuthError::DuplicateEmail
            }
            _ => AuthError::Database(err),
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
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Storage(msg) => {
                tracing::error!(message = %msg, "Auth storage error");
            }
            AuthError::Hashing(msg) | AuthError::Verification(msg) => {
                tracing::error!(message = %msg, "Credential store failure");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::AccountNotActive => {
                tracing::warn!("Login attempt on inactive account");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        err.to_app_error()
    }
}

impl From<PasswordHashError> for AuthError {
    fn from(err: PasswordHashError) -> Self {
        match err {
            PasswordHashError::HashingFailed(msg) => AuthError::Hashing(msg),
            PasswordHashError::InvalidHashFormat => {
                AuthError::Verification("stored hash is not a valid PHC string".to_string())
            }
            PasswordHashError::VerificationFailed(msg) => AuthError::Verification(msg),
        }
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        AuthError::Storage(format!("session data: {err}"))
    }
}
