//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

pub use types::ValidationError;

use og_shared::{error_codes, ErrorResponse, IntoErrorResponse};
use thiserror::Error;

/// Core domain errors
///
/// Policy rejections (wrong code, expired code, rate limited) are not errors;
/// they are reported through the service result types. Everything here is a
/// failure the caller may retry or must fix.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The record store rejected or failed a call
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// The email collaborator did not accept the passcode
    #[error("Delivery error: {message}")]
    Delivery { message: String },

    /// A collaborator call did not finish within its bound
    #[error("Timed out: {operation}")]
    Timeout { operation: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Stable machine-readable code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } | DomainError::ValidationErr(_) => {
                error_codes::VALIDATION_ERROR
            }
            DomainError::Storage { .. } => error_codes::STORAGE_UNAVAILABLE,
            DomainError::Delivery { .. } => error_codes::DELIVERY_FAILED,
            DomainError::Timeout { .. } => error_codes::TIMEOUT,
            DomainError::Internal { .. } => error_codes::INTERNAL_ERROR,
        }
    }

    /// Whether repeating the same request later can succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DomainError::Storage { .. } | DomainError::Delivery { .. } | DomainError::Timeout { .. }
        )
    }

    /// Message safe to show to an end user
    pub fn user_message(&self) -> String {
        match self {
            DomainError::Validation { message } => message.clone(),
            DomainError::ValidationErr(e) => e.to_string(),
            DomainError::Storage { .. } | DomainError::Timeout { .. } => {
                "Service temporarily unavailable. Please try again".to_string()
            }
            DomainError::Delivery { .. } => {
                "We could not send the code to this address. Please try again".to_string()
            }
            DomainError::Internal { .. } => "An internal error occurred".to_string(),
        }
    }
}

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.error_code(), self.user_message())
            .add_detail("retryable", self.is_retryable())
    }
}
