//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the OtpGate service,
//! following Clean Architecture principles. It provides concrete implementations
//! for the passcode record store and the email dispatch collaborator.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL passcode repository using SQLx
//! - **Email**: Template-based email providers (HTTP API, mock)
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

use og_core::errors::DomainError;

// Re-export core types for convenience
pub use og_core::errors::*;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Email service module - External email providers
pub mod email;

/// Configuration module for infrastructure services
pub mod config {
    //! Configuration management for infrastructure services

    use serde::{Deserialize, Serialize};

    pub use og_shared::config::{DatabaseConfig, EmailConfig};

    /// Infrastructure configuration settings
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct InfrastructureConfig {
        /// Database configuration
        pub database: DatabaseConfig,
        /// Email service configuration
        pub email: EmailConfig,
    }
}

/// Load infrastructure configuration from environment
pub fn load_config() -> Result<config::InfrastructureConfig, InfrastructureError> {
    dotenvy::dotenv().ok(); // Load .env file if present

    let config = config::InfrastructureConfig {
        database: og_shared::DatabaseConfig::from_env(),
        email: og_shared::EmailConfig::from_env(),
    };

    if config.email.provider == og_shared::EmailProvider::Http && !config.email.has_credentials() {
        return Err(InfrastructureError::Config(
            "EMAIL_SERVICE_ID and EMAIL_USER_ID are required for the http email provider".to_string(),
        ));
    }

    Ok(config)
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Email service error
    #[error("Email service error: {0}")]
    Email(String),

    /// General infrastructure error
    #[error("Infrastructure error: {0}")]
    General(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Database(e) => DomainError::Storage {
                message: e.to_string(),
            },
            InfrastructureError::Http(e) => DomainError::Delivery {
                message: e.to_string(),
            },
            InfrastructureError::Email(message) => DomainError::Delivery { message },
            InfrastructureError::Config(message) | InfrastructureError::General(message) => {
                DomainError::Internal { message }
            }
        }
    }
}
