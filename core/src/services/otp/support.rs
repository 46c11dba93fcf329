//! Helpers shared by the passcode components

use std::future::Future;
use std::time::Duration;

use og_shared::utils::normalize_email;

use crate::errors::{DomainError, DomainResult, ValidationError};

/// Run a store call under `limit`, mapping an elapsed bound to `DomainError::Timeout`
pub(crate) async fn bounded<T, F>(limit: Duration, operation: &str, call: F) -> DomainResult<T>
where
    F: Future<Output = DomainResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(DomainError::Timeout {
            operation: operation.to_string(),
        }),
    }
}

/// Trim and lowercase an identity, rejecting an empty result
pub(crate) fn normalize_identity(raw: &str) -> Result<String, ValidationError> {
    let identity = normalize_email(raw);
    if identity.is_empty() {
        return Err(ValidationError::EmptyIdentity);
    }
    Ok(identity)
}
