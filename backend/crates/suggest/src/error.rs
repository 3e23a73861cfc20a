//! Suggest Error Types
//!
//! This module provides suggest-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.
//!
//! Per-row parse failures and corrupt cache payloads are NOT errors here;
//! they resolve to skipped rows and cache misses inside the crate. What
//! remains is genuinely exceptional: an unreachable store or database.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::store::StoreError;
use thiserror::Error;

/// Suggest-specific result type alias
pub type SuggestResult<T> = Result<T, SuggestError>;

/// Suggest-specific error variants
#[derive(Debug, Error)]
pub enum SuggestError {
    /// The history database failed
    #[error("History source error: {0}")]
    Database(#[from] sqlx::Error),

    /// The durable cache store failed (distinct from a cache miss)
    #[error("Cache store error: {0}")]
    Store(#[from] StoreError),

    /// The request itself was malformed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SuggestError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SuggestError::Database(_) => ErrorKind::InternalServerError,
            SuggestError::Store(_) => ErrorKind::ServiceUnavailable,
            SuggestError::InvalidRequest(_) => ErrorKind::BadRequest,
            SuggestError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            SuggestError::Database(e) => {
                tracing::error!(error = %e, "History source error");
            }
            SuggestError::Store(e) => {
                tracing::warn!(error = %e, "Cache store unavailable");
            }
            SuggestError::Internal(msg) => {
                tracing::error!(message = %msg, "Suggest internal error");
            }
            SuggestError::InvalidRequest(_) => {
                tracing::debug!(error = %self, "Invalid suggest request");
            }
        }
    }
}

impl From<SuggestError> for AppError {
    fn from(err: SuggestError) -> Self {
        let kind = err.kind();
        let message = match &err {
            // Do not leak infrastructure details to clients.
            SuggestError::Database(_) => "History source error".to_string(),
            SuggestError::Store(_) => "Cache unavailable".to_string(),
            _ => err.to_string(),
        };
        AppError::new(kind, message)
    }
}

impl IntoResponse for SuggestError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
