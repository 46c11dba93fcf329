//! Mapping from domain results to HTTP responses

use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse};
use std::collections::HashMap;
use validator::ValidationErrors;

use og_core::errors::DomainError;
use og_core::services::otp::VerifyOutcome;
use og_shared::{error_codes, ErrorResponse, IntoErrorResponse};

/// HTTP status for a domain error
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Validation { .. } | DomainError::ValidationErr(_) => StatusCode::BAD_REQUEST,
        DomainError::Delivery { .. } => StatusCode::BAD_GATEWAY,
        DomainError::Storage { .. } | DomainError::Timeout { .. } => StatusCode::SERVICE_UNAVAILABLE,
        DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    let status = status_for(error);
    if status.is_server_error() {
        tracing::error!(error = %error, "request failed");
    } else {
        tracing::debug!(error = %error, "request rejected");
    }

    HttpResponse::build(status).json(error.to_error_response())
}

/// 429 with a `Retry-After` header
pub fn rate_limited(wait_seconds: i64) -> HttpResponse {
    let body = ErrorResponse::new(
        error_codes::RATE_LIMIT_EXCEEDED,
        format!("Please wait {} seconds before requesting a new code", wait_seconds),
    )
    .add_detail("wait_seconds", wait_seconds);

    HttpResponse::TooManyRequests()
        .insert_header(("Retry-After", wait_seconds.max(0).to_string()))
        .json(body)
}

/// Response for a rejected verification
///
/// Returns `None` for `Verified`, which is not an error.
pub fn verify_rejection(outcome: VerifyOutcome) -> Option<HttpResponse> {
    let (status, code) = match outcome {
        VerifyOutcome::Verified => return None,
        VerifyOutcome::InvalidOrExpired => {
            (StatusCode::BAD_REQUEST, error_codes::CODE_INVALID_OR_EXPIRED)
        }
        VerifyOutcome::InvalidCode { .. } => (StatusCode::BAD_REQUEST, error_codes::CODE_INVALID),
        VerifyOutcome::MaxAttemptsExceeded => {
            (StatusCode::TOO_MANY_REQUESTS, error_codes::MAX_ATTEMPTS_EXCEEDED)
        }
    };

    let mut body = ErrorResponse::new(code, outcome.message());
    if let Some(remaining) = outcome.remaining_attempts() {
        body = body.add_detail("remaining_attempts", remaining);
    }
    Some(HttpResponse::build(status).json(body))
}

/// 400 listing the failing fields
pub fn validation_failed(errors: &ValidationErrors) -> HttpResponse {
    let fields: HashMap<String, Vec<String>> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect();

    HttpResponse::BadRequest().json(
        ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request data")
            .add_detail("fields", fields),
    )
}

/// Malformed JSON bodies get the same envelope as every other error
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let body = ErrorResponse::new(error_codes::BAD_REQUEST, err.to_string());
    actix_web::error::InternalError::from_response(err, HttpResponse::BadRequest().json(body))
        .into()
}

/// Query strings that fail to deserialize
pub fn query_error_handler(
    err: actix_web::error::QueryPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    let body = ErrorResponse::new(error_codes::BAD_REQUEST, err.to_string());
    actix_web::error::InternalError::from_response(err, HttpResponse::BadRequest().json(body))
        .into()
}
