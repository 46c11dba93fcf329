use actix_web::{web, HttpResponse};
use validator::Validate;

use og_core::repositories::OtpRepository;
use og_core::services::otp::EmailServiceTrait;
use og_core::{DomainError, OtpPurpose};
use og_shared::ApiResponse;

use super::AppState;
use crate::dto::StatusQuery;
use crate::handlers::{handle_domain_error, validation_failed};

/// Handler for GET /api/v1/otp/status?email=&purpose=
///
/// Read-only; never consumes an attempt.
pub async fn otp_status<R, E>(
    state: web::Data<AppState<R, E>>,
    query: web::Query<StatusQuery>,
) -> HttpResponse
where
    R: OtpRepository + 'static,
    E: EmailServiceTrait + 'static,
{
    if let Err(errors) = query.validate() {
        return validation_failed(&errors);
    }

    let purpose: OtpPurpose = match query.purpose.parse() {
        Ok(purpose) => purpose,
        Err(e) => return handle_domain_error(&DomainError::from(e)),
    };

    match state.otp_service.status(&query.email, purpose).await {
        Ok(status) => HttpResponse::Ok().json(ApiResponse::success(status)),
        Err(error) => handle_domain_error(&error),
    }
}
