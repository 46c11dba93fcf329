//! Passcode policy configuration

use serde::{Deserialize, Serialize};

use super::env_or;

/// Policy knobs for passcode issuance and verification
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Minutes a passcode stays valid after issuance
    #[serde(default = "default_validity_minutes")]
    pub validity_minutes: i64,

    /// Verification guesses allowed against one passcode
    #[serde(default = "default_max_attempts")]
    pub max_attempts: i32,

    /// Seconds that must pass between two issuances for the same identity and purpose
    #[serde(default = "default_resend_cooldown")]
    pub resend_cooldown_seconds: i64,

    /// Minutes a verified record is kept before the reaper removes it
    #[serde(default = "default_verified_retention")]
    pub verified_retention_minutes: i64,

    /// Upper bound for a single store call in milliseconds
    #[serde(default = "default_store_timeout")]
    pub store_timeout_ms: u64,

    /// Upper bound for a single email dispatch in milliseconds
    #[serde(default = "default_dispatch_timeout")]
    pub dispatch_timeout_ms: u64,

    /// How often the scheduled sweep runs, in seconds (0 disables it)
    #[serde(default = "default_reaper_interval")]
    pub reaper_interval_seconds: u64,

    /// Email template used for passcode delivery
    #[serde(default = "default_template_id")]
    pub email_template_id: String,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            validity_minutes: default_validity_minutes(),
            max_attempts: default_max_attempts(),
            resend_cooldown_seconds: default_resend_cooldown(),
            verified_retention_minutes: default_verified_retention(),
            store_timeout_ms: default_store_timeout(),
            dispatch_timeout_ms: default_dispatch_timeout(),
            reaper_interval_seconds: default_reaper_interval(),
            email_template_id: default_template_id(),
        }
    }
}

impl OtpConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_env_or(Self::default())
    }

    /// Override the given configuration with any `OTP_*` environment variables present
    pub fn from_env_or(base: Self) -> Self {
        Self {
            validity_minutes: env_or("OTP_VALIDITY_MINUTES", base.validity_minutes),
            max_attempts: env_or("OTP_MAX_ATTEMPTS", base.max_attempts),
            resend_cooldown_seconds: env_or("OTP_RESEND_COOLDOWN_SECONDS", base.resend_cooldown_seconds),
            verified_retention_minutes: env_or(
                "OTP_VERIFIED_RETENTION_MINUTES",
                base.verified_retention_minutes,
            ),
            store_timeout_ms: env_or("OTP_STORE_TIMEOUT_MS", base.store_timeout_ms),
            dispatch_timeout_ms: env_or("OTP_DISPATCH_TIMEOUT_MS", base.dispatch_timeout_ms),
            reaper_interval_seconds: env_or("OTP_REAPER_INTERVAL_SECONDS", base.reaper_interval_seconds),
            email_template_id: std::env::var("OTP_EMAIL_TEMPLATE_ID").unwrap_or(base.email_template_id),
        }
    }
}

fn default_validity_minutes() -> i64 {
    10
}

fn default_max_attempts() -> i32 {
    5
}

fn default_resend_cooldown() -> i64 {
    60
}

fn default_verified_retention() -> i64 {
    60
}

fn default_store_timeout() -> u64 {
    5_000
}

fn default_dispatch_timeout() -> u64 {
    10_000
}

fn default_reaper_interval() -> u64 {
    300
}

fn default_template_id() -> String {
    String::from("otp_code")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_policy() {
        let config = OtpConfig::default();
        assert_eq!(config.validity_minutes, 10);
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.resend_cooldown_seconds, 60);
        assert_eq!(config.verified_retention_minutes, 60);
        assert_eq!(config.email_template_id, "otp_code");
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config: OtpConfig = serde_json::from_str(r#"{"max_attempts": 3}"#).unwrap();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.validity_minutes, 10);
    }
}
