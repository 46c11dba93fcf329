//! Mock implementations for testing the passcode services

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::repositories::MockOtpRepository;
use crate::services::otp::{
    EmailServiceTrait, EmailTemplateParams, ManualClock, OtpService, OtpServiceConfig,
};

/// Recording email service
pub struct MockEmailService {
    pub sent: Arc<RwLock<Vec<(String, EmailTemplateParams)>>>,
    pub should_fail: Arc<RwLock<bool>>,
    pub delay: Arc<RwLock<Option<Duration>>>,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(RwLock::new(Vec::new())),
            should_fail: Arc::new(RwLock::new(false)),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn set_should_fail(&self, fail: bool) {
        *self.should_fail.write().await = fail;
    }

    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.read().await.len()
    }

    /// Passcode carried by the most recent dispatch
    pub async fn last_code(&self) -> Option<String> {
        self.sent
            .read()
            .await
            .last()
            .map(|(_, params)| params.passcode.clone())
    }

    pub async fn last_params(&self) -> Option<EmailTemplateParams> {
        self.sent.read().await.last().map(|(_, params)| params.clone())
    }
}

#[async_trait]
impl EmailServiceTrait for MockEmailService {
    async fn send_template(
        &self,
        template_id: &str,
        params: &EmailTemplateParams,
    ) -> Result<String, String> {
        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if *self.should_fail.read().await {
            return Err("Mock email failure".to_string());
        }

        let mut sent = self.sent.write().await;
        sent.push((template_id.to_string(), params.clone()));
        Ok(format!("mock-email-{}", sent.len()))
    }
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// Service wired to mocks and a manual clock starting at `t0()`
pub struct Fixture {
    pub service: OtpService<MockOtpRepository, MockEmailService>,
    pub repository: Arc<MockOtpRepository>,
    pub email: Arc<MockEmailService>,
    pub clock: ManualClock,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: OtpServiceConfig) -> Self {
        let repository = Arc::new(MockOtpRepository::new());
        let email = Arc::new(MockEmailService::new());
        let clock = ManualClock::new(t0());
        let service = OtpService::with_clock(
            Arc::clone(&repository),
            Arc::clone(&email),
            config,
            Arc::new(clock.clone()),
        );

        Self {
            service,
            repository,
            email,
            clock,
        }
    }
}

pub fn test_config() -> OtpServiceConfig {
    OtpServiceConfig {
        store_timeout: Duration::from_millis(200),
        dispatch_timeout: Duration::from_millis(200),
        ..OtpServiceConfig::default()
    }
}
