//! Email dispatch configuration

use serde::{Deserialize, Serialize};

use super::env_or;

/// Which email backend delivers passcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailProvider {
    /// Log messages instead of sending them
    Mock,
    /// Template-based HTTP email API
    Http,
}

impl Default for EmailProvider {
    fn default() -> Self {
        EmailProvider::Mock
    }
}

impl std::str::FromStr for EmailProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(EmailProvider::Mock),
            "http" | "api" => Ok(EmailProvider::Http),
            _ => Err(format!("Invalid email provider: {}", s)),
        }
    }
}

/// Email service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    /// Provider backend
    #[serde(default)]
    pub provider: EmailProvider,

    /// Endpoint that accepts template send requests
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Provider-side service identifier
    #[serde(default)]
    pub service_id: String,

    /// Public key / user identifier for the provider account
    #[serde(default)]
    pub user_id: String,

    /// Private access token (optional for some providers)
    #[serde(default)]
    pub access_token: Option<String>,

    /// Name shown as sender in the rendered template
    #[serde(default = "default_sender_name")]
    pub sender_name: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: EmailProvider::default(),
            endpoint: default_endpoint(),
            service_id: String::new(),
            user_id: String::new(),
            access_token: None,
            sender_name: default_sender_name(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl EmailConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_env_or(Self::default())
    }

    /// Override the given configuration with any `EMAIL_*` environment variables present
    pub fn from_env_or(base: Self) -> Self {
        Self {
            provider: env_or("EMAIL_PROVIDER", base.provider),
            endpoint: std::env::var("EMAIL_ENDPOINT").unwrap_or(base.endpoint),
            service_id: std::env::var("EMAIL_SERVICE_ID").unwrap_or(base.service_id),
            user_id: std::env::var("EMAIL_USER_ID").unwrap_or(base.user_id),
            access_token: std::env::var("EMAIL_ACCESS_TOKEN").ok().or(base.access_token),
            sender_name: std::env::var("EMAIL_SENDER_NAME").unwrap_or(base.sender_name),
            request_timeout_secs: env_or("EMAIL_REQUEST_TIMEOUT_SECS", base.request_timeout_secs),
        }
    }

    /// Whether enough credentials are present to talk to the HTTP provider
    pub fn has_credentials(&self) -> bool {
        !self.service_id.is_empty() && !self.user_id.is_empty()
    }
}

fn default_endpoint() -> String {
    String::from("https://api.emailjs.com/api/v1.0/email/send")
}

fn default_sender_name() -> String {
    String::from("OtpGate")
}

fn default_request_timeout() -> u64 {
    10
}
