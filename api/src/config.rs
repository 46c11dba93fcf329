//! Layered configuration for the API binary
//!
//! Precedence, lowest first: built-in defaults for the detected environment
//! (including the plain `DATABASE_*`, `EMAIL_*`, `SERVER_*` variables),
//! then `config.<environment>.toml` if present, then `OTP__`-prefixed
//! variables such as `OTP__SERVER__PORT` or `OTP__OTP__MAX_ATTEMPTS`.

use ::config::{Config as Layers, ConfigError, Environment as EnvSource, File};
use serde::{Deserialize, Serialize};

use og_shared::config::{AppConfig, Environment};

/// Where passcode records live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local store; records vanish on restart
    Memory,
    /// MySQL through the infrastructure repository
    Mysql,
}

impl StorageBackend {
    fn for_environment(env: Environment) -> Self {
        if env.is_development() {
            StorageBackend::Memory
        } else {
            StorageBackend::Mysql
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub storage: StorageBackend,
}

impl Config {
    /// Load configuration using the `ENVIRONMENT` variable to pick defaults
    pub fn load() -> Result<Self, ConfigError> {
        let base = AppConfig::from_env();
        let file = base.environment.config_file().to_string();
        Self::load_from(base, &file)
    }

    /// Load configuration from explicit defaults and an optional TOML file
    pub fn load_from(base: AppConfig, config_file: &str) -> Result<Self, ConfigError> {
        let default_storage = StorageBackend::for_environment(base.environment);

        let layers = Layers::builder()
            .add_source(Layers::try_from(&base)?)
            .add_source(File::with_name(config_file).required(false))
            .add_source(
                EnvSource::with_prefix("OTP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let storage = match layers.get::<StorageBackend>("storage") {
            Ok(storage) => storage,
            Err(ConfigError::NotFound(_)) => default_storage,
            Err(e) => return Err(e),
        };

        Ok(Self {
            app: layers.try_deserialize()?,
            storage,
        })
    }

    /// Reject settings the passcode service cannot run with
    pub fn validate(&self) -> Result<(), String> {
        let otp = &self.app.otp;
        if otp.validity_minutes <= 0 {
            return Err("otp.validity_minutes must be positive".to_string());
        }
        if otp.max_attempts <= 0 {
            return Err("otp.max_attempts must be positive".to_string());
        }
        if otp.resend_cooldown_seconds < 0 {
            return Err("otp.resend_cooldown_seconds must not be negative".to_string());
        }
        if self.app.server.port == 0 {
            return Err("server.port must be set".to_string());
        }
        if self.storage == StorageBackend::Mysql && self.app.database.url.is_empty() {
            return Err("database.url is required for mysql storage".to_string());
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.app.environment.is_production()
    }
}
