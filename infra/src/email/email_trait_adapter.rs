//! Email Service Trait Adapter
//!
//! Implements the core EmailServiceTrait on top of any infrastructure
//! EmailService, bridging provider errors into plain messages.

use async_trait::async_trait;

use og_core::services::otp::{EmailServiceTrait, EmailTemplateParams};
use og_shared::EmailConfig;

use super::create_email_service;
use super::email_service::EmailService;

/// Adapter that implements the core EmailServiceTrait
pub struct EmailServiceAdapter {
    inner: Box<dyn EmailService>,
}

impl EmailServiceAdapter {
    /// Wrap an already constructed provider
    pub fn new(inner: Box<dyn EmailService>) -> Self {
        Self { inner }
    }

    /// Build the provider selected by `config`
    pub fn from_config(config: &EmailConfig) -> Self {
        Self::new(create_email_service(config))
    }

    pub fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }

    pub async fn is_available(&self) -> bool {
        self.inner.is_available().await
    }
}

#[async_trait]
impl EmailServiceTrait for EmailServiceAdapter {
    async fn send_template(
        &self,
        template_id: &str,
        params: &EmailTemplateParams,
    ) -> Result<String, String> {
        self.inner
            .send_template(template_id, params)
            .await
            .map_err(|e| e.to_string())
    }
}
