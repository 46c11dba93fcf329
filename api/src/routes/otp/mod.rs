//! Passcode route handlers
//!
//! - Requesting a passcode (rate limited)
//! - Verifying a passcode
//! - Inspecting the active passcode

pub mod request_code;
pub mod status;
pub mod verify_code;

use std::sync::Arc;

use og_core::repositories::OtpRepository;
use og_core::services::otp::{EmailServiceTrait, OtpService};

/// Application state that holds shared services
pub struct AppState<R, E>
where
    R: OtpRepository + 'static,
    E: EmailServiceTrait,
{
    pub otp_service: Arc<OtpService<R, E>>,
}

impl<R, E> AppState<R, E>
where
    R: OtpRepository + 'static,
    E: EmailServiceTrait,
{
    pub fn new(otp_service: Arc<OtpService<R, E>>) -> Self {
        Self { otp_service }
    }
}
