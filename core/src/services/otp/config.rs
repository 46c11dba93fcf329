//! Configuration for the passcode services

use std::time::Duration;

use og_shared::OtpConfig;

use crate::domain::entities::otp_record::{
    DEFAULT_VALIDITY_MINUTES, MAX_ATTEMPTS, VERIFIED_RETENTION_MINUTES,
};

/// Configuration for the passcode services
#[derive(Debug, Clone)]
pub struct OtpServiceConfig {
    /// Number of minutes before a passcode expires
    pub validity_minutes: i64,
    /// Maximum number of verification attempts allowed
    pub max_attempts: i32,
    /// Minimum seconds between two issuances for the same identity and purpose
    pub resend_cooldown_seconds: i64,
    /// Minutes a verified record is kept before it becomes reapable
    pub verified_retention_minutes: i64,
    /// Bound on every store call
    pub store_timeout: Duration,
    /// Bound on a single email dispatch
    pub dispatch_timeout: Duration,
    /// Interval of the scheduled sweep; zero disables it
    pub reaper_interval: Duration,
    /// Template the email collaborator renders
    pub email_template_id: String,
    /// Product name substituted into the email
    pub app_name: String,
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self {
            validity_minutes: DEFAULT_VALIDITY_MINUTES,
            max_attempts: MAX_ATTEMPTS,
            resend_cooldown_seconds: 60,
            verified_retention_minutes: VERIFIED_RETENTION_MINUTES,
            store_timeout: Duration::from_secs(5),
            dispatch_timeout: Duration::from_secs(10),
            reaper_interval: Duration::from_secs(300),
            email_template_id: "otp_code".to_string(),
            app_name: "OtpGate".to_string(),
        }
    }
}

impl OtpServiceConfig {
    /// Build from the shared policy configuration
    pub fn from_config(config: &OtpConfig, app_name: impl Into<String>) -> Self {
        Self {
            validity_minutes: config.validity_minutes,
            max_attempts: config.max_attempts,
            resend_cooldown_seconds: config.resend_cooldown_seconds,
            verified_retention_minutes: config.verified_retention_minutes,
            store_timeout: Duration::from_millis(config.store_timeout_ms),
            dispatch_timeout: Duration::from_millis(config.dispatch_timeout_ms),
            reaper_interval: Duration::from_secs(config.reaper_interval_seconds),
            email_template_id: config.email_template_id.clone(),
            app_name: app_name.into(),
        }
    }
}
