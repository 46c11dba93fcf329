//! HTTP Template Email Service Implementation
//!
//! Sends passcodes through a hosted template-send API (EmailJS-style): the
//! provider owns the template, we post its id plus the parameters.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, info};
use uuid::Uuid;

use og_core::services::otp::EmailTemplateParams;
use og_shared::EmailConfig;

use super::email_service::{mask_email, EmailService};
use crate::InfrastructureError;

/// HTTP email service configuration
#[derive(Debug, Clone)]
pub struct HttpEmailConfig {
    /// Template-send endpoint
    pub endpoint: String,
    /// Provider-side service identifier
    pub service_id: String,
    /// Public key / account identifier
    pub user_id: String,
    /// Private access token, when the account requires one
    pub access_token: Option<String>,
    /// Sender name substituted into the template
    pub sender_name: String,
    /// Timeout for API requests
    pub request_timeout: Duration,
}

impl From<&EmailConfig> for HttpEmailConfig {
    fn from(config: &EmailConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            service_id: config.service_id.clone(),
            user_id: config.user_id.clone(),
            access_token: config.access_token.clone(),
            sender_name: config.sender_name.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }
}

#[derive(Serialize)]
struct TemplateParams<'a> {
    #[serde(flatten)]
    params: &'a EmailTemplateParams,
    from_name: &'a str,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
    template_params: TemplateParams<'a>,
}

/// HTTP template email service implementation
pub struct HttpEmailService {
    client: reqwest::Client,
    config: HttpEmailConfig,
}

impl HttpEmailService {
    /// Create a new HTTP email service
    pub fn new(config: HttpEmailConfig) -> Result<Self, InfrastructureError> {
        if config.endpoint.is_empty() {
            return Err(InfrastructureError::Config(
                "Email endpoint must not be empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        info!("HTTP email service initialized for endpoint: {}", config.endpoint);

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        Self::new(HttpEmailConfig::from(&EmailConfig::from_env()))
    }
}

#[async_trait]
impl EmailService for HttpEmailService {
    async fn send_template(
        &self,
        template_id: &str,
        params: &EmailTemplateParams,
    ) -> Result<String, InfrastructureError> {
        let masked = mask_email(&params.to_email);
        let request = SendRequest {
            service_id: &self.config.service_id,
            template_id,
            user_id: &self.config.user_id,
            access_token: self.config.access_token.as_deref(),
            template_params: TemplateParams {
                params,
                from_name: &self.config.sender_name,
            },
        };

        debug!("Posting template {} for {}", template_id, masked);

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Email API request failed for {}: {}", masked, e);
                InfrastructureError::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Email API rejected message for {}: {} {}", masked, status, body);
            return Err(InfrastructureError::Email(format!(
                "Email API returned {}: {}",
                status, body
            )));
        }

        let message_id = format!("email_{}", Uuid::new_v4());
        info!(
            target: "email_service",
            provider = "http",
            recipient = %masked,
            template_id = %template_id,
            message_id = %message_id,
            "Email accepted by provider"
        );

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "HTTP"
    }
}
