//! Trait for email service integration

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::otp_record::OtpRecord;

/// Parameters substituted into the passcode email template
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailTemplateParams {
    /// Recipient address
    pub to_email: String,
    /// The passcode itself
    pub passcode: String,
    /// Human-readable purpose label
    pub purpose: String,
    /// Expiry instant formatted for display
    pub expiry_time: String,
    /// Validity window formatted for display, e.g. "10 minutes"
    pub validity: String,
    /// Product name
    pub app_name: String,
}

impl EmailTemplateParams {
    /// Build the template parameters for a freshly issued record
    pub fn for_record(record: &OtpRecord, app_name: &str) -> Self {
        let minutes = (record.expires_at - record.created_at).num_minutes();
        Self {
            to_email: record.identity.clone(),
            passcode: record.code.clone(),
            purpose: record.purpose.label().to_string(),
            expiry_time: record.expires_at.format("%H:%M UTC").to_string(),
            validity: format_minutes(minutes),
            app_name: app_name.to_string(),
        }
    }
}

// Passcodes never reach logs, even through `{:?}`
impl std::fmt::Debug for EmailTemplateParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailTemplateParams")
            .field("to_email", &self.to_email)
            .field("passcode", &"******")
            .field("purpose", &self.purpose)
            .field("expiry_time", &self.expiry_time)
            .field("validity", &self.validity)
            .field("app_name", &self.app_name)
            .finish()
    }
}

fn format_minutes(minutes: i64) -> String {
    match minutes {
        1 => "1 minute".to_string(),
        n => format!("{} minutes", n),
    }
}

/// Trait for email service integration
#[async_trait]
pub trait EmailServiceTrait: Send + Sync {
    /// Render `template_id` with `params` and send it
    ///
    /// Returns the provider's message id. Acceptance only guarantees that a
    /// dispatch was attempted, not that the message reached the inbox.
    async fn send_template(
        &self,
        template_id: &str,
        params: &EmailTemplateParams,
    ) -> Result<String, String>;
}
