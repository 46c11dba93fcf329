//! Unit tests for domain error types

use og_shared::{error_codes, IntoErrorResponse};

use crate::errors::{DomainError, ValidationError};

#[test]
fn test_storage_and_delivery_are_distinct() {
    let storage = DomainError::Storage { message: "connection reset".to_string() };
    let delivery = DomainError::Delivery { message: "provider returned 500".to_string() };

    assert_eq!(storage.error_code(), error_codes::STORAGE_UNAVAILABLE);
    assert_eq!(delivery.error_code(), error_codes::DELIVERY_FAILED);
    assert_ne!(storage.user_message(), delivery.user_message());
    assert!(storage.is_retryable());
    assert!(delivery.is_retryable());
}

#[test]
fn test_user_message_hides_internal_detail() {
    let error = DomainError::Storage { message: "mysql: table otp_records is locked".to_string() };
    assert!(!error.user_message().contains("mysql"));
}

#[test]
fn test_validation_error_bridge() {
    let error: DomainError = ValidationError::InvalidEmail.into();
    assert_eq!(error.error_code(), error_codes::VALIDATION_ERROR);
    assert!(!error.is_retryable());
    assert_eq!(error.user_message(), "Invalid email address");
}

#[test]
fn test_error_response_carries_retry_hint() {
    let error = DomainError::Timeout { operation: "email dispatch".to_string() };
    let response = error.to_error_response();
    assert_eq!(response.error, error_codes::TIMEOUT);
    let details = response.details.unwrap();
    assert_eq!(details.get("retryable"), Some(&serde_json::json!(true)));
}
