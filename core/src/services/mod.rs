//! Business services containing domain logic and use cases.

pub mod otp;

// Re-export commonly used types
pub use otp::{
    CleanupResult, Clock, EmailServiceTrait, EmailTemplateParams, IssueAllowance, IssueResult,
    ManualClock, OtpIssuer, OtpRateLimiter, OtpReaper, OtpService, OtpServiceConfig, OtpStatus,
    OtpVerifier, RequestCodeOutcome, SystemClock, VerifyOutcome,
};
