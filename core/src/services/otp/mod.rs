//! Email passcode service module
//!
//! This module provides the complete passcode workflow:
//! - Issuance with compensating rollback when dispatch fails
//! - Verification with attempt tracking and single-use consumption
//! - Per identity and purpose rate limiting
//! - Best-effort and scheduled purging of stale records

mod clock;
mod config;
mod issuer;
mod rate_limiter;
mod reaper;
mod service;
mod support;
mod traits;
mod types;
mod verifier;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::OtpServiceConfig;
pub use issuer::OtpIssuer;
pub use rate_limiter::OtpRateLimiter;
pub use reaper::OtpReaper;
pub use service::OtpService;
pub use traits::{EmailServiceTrait, EmailTemplateParams};
pub use types::{CleanupResult, IssueAllowance, IssueResult, OtpStatus, RequestCodeOutcome, VerifyOutcome};
pub use verifier::OtpVerifier;
