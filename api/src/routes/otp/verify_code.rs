use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use og_core::repositories::OtpRepository;
use og_core::services::otp::EmailServiceTrait;
use og_core::{DomainError, OtpPurpose};
use og_shared::utils::mask_email;
use og_shared::ApiResponse;

use super::request_code::extract_client_ip;
use super::AppState;
use crate::dto::{VerifyCodeRequest, VerifyCodeResponse};
use crate::handlers::{handle_domain_error, validation_failed, verify_rejection};

/// Handler for POST /api/v1/otp/verify
///
/// A successful verification consumes the passcode. Wrong guesses report the
/// attempts left; once the ceiling is reached the caller must request a new
/// passcode.
///
/// # Request Body
///
/// ```json
/// {
///     "email": "user@example.com",
///     "code": "042137",
///     "purpose": "password_reset"
/// }
/// ```
pub async fn verify_code<R, E>(
    req: HttpRequest,
    state: web::Data<AppState<R, E>>,
    request: web::Json<VerifyCodeRequest>,
) -> HttpResponse
where
    R: OtpRepository + 'static,
    E: EmailServiceTrait + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_failed(&errors);
    }

    let purpose: OtpPurpose = match request.purpose.parse() {
        Ok(purpose) => purpose,
        Err(e) => return handle_domain_error(&DomainError::from(e)),
    };

    let outcome = match state
        .otp_service
        .verify(&request.email, &request.code, purpose)
        .await
    {
        Ok(outcome) => outcome,
        Err(error) => return handle_domain_error(&error),
    };

    if let Some(rejection) = verify_rejection(outcome) {
        tracing::info!(
            email = %mask_email(&request.email),
            purpose = %purpose,
            ip = %extract_client_ip(&req),
            "Verification rejected"
        );
        return rejection;
    }

    HttpResponse::Ok().json(
        ApiResponse::success(VerifyCodeResponse {
            verified: true,
            remaining_attempts: None,
        })
        .with_message(outcome.message()),
    )
}
