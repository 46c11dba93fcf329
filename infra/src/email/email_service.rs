//! Email Service Interface
//!
//! Defines the trait for email service implementations that deliver
//! templated passcode messages.

use async_trait::async_trait;

use og_core::services::otp::EmailTemplateParams;

use crate::InfrastructureError;

pub use og_shared::utils::mask_email;

/// Email service trait for sending templated messages
///
/// Implementations include:
/// - HTTP template-send API
/// - Mock implementation for development
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Render a provider-side template and send it
    ///
    /// # Arguments
    ///
    /// * `template_id` - Provider template identifier
    /// * `params` - Values substituted into the template
    ///
    /// # Returns
    ///
    /// * `Ok(message_id)` - Identifier for the accepted message
    /// * `Err(InfrastructureError)` - If the provider refused or could not be reached
    async fn send_template(
        &self,
        template_id: &str,
        params: &EmailTemplateParams,
    ) -> Result<String, InfrastructureError>;

    /// Get the service provider name
    fn provider_name(&self) -> &str;

    /// Check if the service is available
    ///
    /// Default implementation always returns true.
    async fn is_available(&self) -> bool {
        true
    }
}
