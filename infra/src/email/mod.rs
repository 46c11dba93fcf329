//! Email Service Module
//!
//! This module provides email service implementations for delivering
//! passcodes through a provider-side template.
//!
//! ## Features
//!
//! - **Email Service Trait**: Common interface for all email providers
//! - **Mock Implementation**: Console output for development
//! - **HTTP Template API**: Production delivery through a template-send endpoint
//! - **Security**: Address masking in logs

pub mod email_service;
pub mod email_trait_adapter;
pub mod http_email;
pub mod mock_email;

// Re-export commonly used types
pub use email_service::EmailService;
pub use email_trait_adapter::EmailServiceAdapter;
pub use http_email::{HttpEmailConfig, HttpEmailService};
pub use mock_email::MockEmailService;

#[cfg(test)]
mod tests;

use og_shared::{EmailConfig, EmailProvider};

/// Create an email service based on configuration
///
/// Returns the appropriate email service implementation based on the
/// provider specified in the configuration. A misconfigured HTTP provider
/// falls back to the mock so the process still starts.
pub fn create_email_service(config: &EmailConfig) -> Box<dyn EmailService> {
    match config.provider {
        EmailProvider::Mock => Box::new(MockEmailService::new()),
        EmailProvider::Http => {
            if !config.has_credentials() {
                tracing::error!("HTTP email provider selected without service_id/user_id");
                tracing::warn!("Falling back to mock email service");
                return Box::new(MockEmailService::new());
            }

            match HttpEmailService::new(HttpEmailConfig::from(config)) {
                Ok(service) => Box::new(service),
                Err(e) => {
                    tracing::error!("Failed to initialize HTTP email service: {}", e);
                    tracing::warn!("Falling back to mock email service");
                    Box::new(MockEmailService::new())
                }
            }
        }
    }
}
