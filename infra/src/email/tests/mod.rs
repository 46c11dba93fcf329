
use og_core::services::otp::EmailTemplateParams;

pub(crate) fn sample_params() -> EmailTemplateParams {
    EmailTemplateParams {
        to_email: "user@example.com".to_string(),
        passcode: "042137".to_string(),
        purpose: "Password Reset".to_string(),
        expiry_time: "12:10 UTC".to_string(),
        validity: "10 minutes".to_string(),
        app_name: "OtpGate".to_string(),
    }
}
