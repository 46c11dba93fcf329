use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RequestCodeRequest {
    /// Address the passcode is sent to
    #[validate(email, length(max = 254))]
    pub email: String,

    /// `password_reset` or `email_verification`
    #[validate(length(min = 1, max = 64))]
    pub purpose: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyCodeRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,

    /// Submitted passcode; its format is not checked, a malformed code is just a wrong guess
    #[validate(length(max = 64))]
    pub code: String,

    #[validate(length(min = 1, max = 64))]
    pub purpose: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StatusQuery {
    #[validate(length(min = 1, max = 254))]
    pub email: String,

    #[validate(length(min = 1, max = 64))]
    pub purpose: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestCodeResponse {
    pub message: String,
    pub expires_at: DateTime<Utc>,
    pub resend_after: i64, // seconds until can resend
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyCodeResponse {
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_attempts: Option<i32>,
}
