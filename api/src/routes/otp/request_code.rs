use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use validator::Validate;

use og_core::repositories::OtpRepository;
use og_core::services::otp::{EmailServiceTrait, RequestCodeOutcome};
use og_core::{DomainError, OtpPurpose};
use og_shared::utils::mask_email;
use og_shared::ApiResponse;

use super::AppState;
use crate::dto::{RequestCodeRequest, RequestCodeResponse};
use crate::handlers::{handle_domain_error, rate_limited, validation_failed};

/// Handler for POST /api/v1/otp/request
///
/// Sends a passcode to the given address unless one was issued for the same
/// address and purpose within the resend window.
///
/// # Request Body
///
/// ```json
/// {
///     "email": "user@example.com",
///     "purpose": "password_reset"
/// }
/// ```
///
/// # Responses
///
/// - 200 with `expires_at` and `resend_after`
/// - 400 malformed address or unknown purpose
/// - 429 resend window still open, `Retry-After` set
/// - 502 the email provider refused the message
/// - 503 the record store is unavailable
pub async fn request_code<R, E>(
    req: HttpRequest,
    state: web::Data<AppState<R, E>>,
    request: web::Json<RequestCodeRequest>,
) -> HttpResponse
where
    R: OtpRepository + 'static,
    E: EmailServiceTrait + 'static,
{
    let client_ip = extract_client_ip(&req);

    if let Err(errors) = request.validate() {
        tracing::warn!(
            email = %mask_email(&request.email),
            ip = %client_ip,
            "Validation failed for request_code"
        );
        return validation_failed(&errors);
    }

    let purpose: OtpPurpose = match request.purpose.parse() {
        Ok(purpose) => purpose,
        Err(e) => return handle_domain_error(&DomainError::from(e)),
    };

    tracing::info!(
        email = %mask_email(&request.email),
        purpose = %purpose,
        ip = %client_ip,
        "Passcode requested"
    );

    match state.otp_service.request_code(&request.email, purpose).await {
        Ok(RequestCodeOutcome::Issued(result)) => {
            let resend_after = result
                .next_resend_at
                .signed_duration_since(Utc::now())
                .num_seconds()
                .max(0);

            HttpResponse::Ok().json(
                ApiResponse::success(RequestCodeResponse {
                    message: result.message().to_string(),
                    expires_at: result.expires_at,
                    resend_after,
                })
                .with_message(result.message()),
            )
        }
        Ok(RequestCodeOutcome::RateLimited { wait_seconds }) => rate_limited(wait_seconds),
        Err(error) => handle_domain_error(&error),
    }
}

/// Extract client IP address from request
pub(crate) fn extract_client_ip(req: &HttpRequest) -> String {
    // X-Forwarded-For first, for reverse proxy deployments
    if let Some(forwarded_for) = req.headers().get("X-Forwarded-For") {
        if let Ok(forwarded_str) = forwarded_for.to_str() {
            if let Some(ip) = forwarded_str.split(',').next() {
                return ip.trim().to_string();
            }
        }
    }

    req.connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_string()
}
