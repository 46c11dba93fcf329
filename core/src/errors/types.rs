//! Input validation errors raised before any collaborator is called

use thiserror::Error;

/// Validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Email address is required")]
    EmptyIdentity,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Unknown passcode purpose: {purpose}")]
    UnknownPurpose { purpose: String },
}
