//! Main passcode service composing issuer, verifier, rate limiter and reaper

use std::sync::Arc;

use crate::domain::entities::otp_record::OtpPurpose;
use crate::errors::DomainResult;
use crate::repositories::OtpRepository;

use super::clock::{Clock, SystemClock};
use super::config::OtpServiceConfig;
use super::issuer::OtpIssuer;
use super::rate_limiter::OtpRateLimiter;
use super::reaper::OtpReaper;
use super::support::{bounded, normalize_identity};
use super::traits::EmailServiceTrait;
use super::types::{CleanupResult, IssueAllowance, IssueResult, OtpStatus, RequestCodeOutcome, VerifyOutcome};
use super::verifier::OtpVerifier;

/// Passcode service for email identity checks
pub struct OtpService<R: OtpRepository + 'static, E: EmailServiceTrait> {
    repository: Arc<R>,
    issuer: OtpIssuer<R, E>,
    verifier: OtpVerifier<R>,
    rate_limiter: OtpRateLimiter<R>,
    reaper: Arc<OtpReaper<R>>,
    clock: Arc<dyn Clock>,
    config: OtpServiceConfig,
}

impl<R: OtpRepository + 'static, E: EmailServiceTrait> OtpService<R, E> {
    /// Create a new passcode service on the wall clock
    ///
    /// # Arguments
    ///
    /// * `repository` - Record store implementation
    /// * `email_service` - Email dispatch implementation
    /// * `config` - Service configuration
    pub fn new(repository: Arc<R>, email_service: Arc<E>, config: OtpServiceConfig) -> Self {
        Self::with_clock(repository, email_service, config, Arc::new(SystemClock))
    }

    /// Create a new passcode service on an explicit clock
    pub fn with_clock(
        repository: Arc<R>,
        email_service: Arc<E>,
        config: OtpServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            issuer: OtpIssuer::new(
                Arc::clone(&repository),
                email_service,
                Arc::clone(&clock),
                config.clone(),
            ),
            verifier: OtpVerifier::new(Arc::clone(&repository), Arc::clone(&clock), config.clone()),
            rate_limiter: OtpRateLimiter::new(
                Arc::clone(&repository),
                Arc::clone(&clock),
                config.clone(),
            ),
            reaper: Arc::new(OtpReaper::new(
                Arc::clone(&repository),
                Arc::clone(&clock),
                config.clone(),
            )),
            repository,
            clock,
            config,
        }
    }

    /// Issue a passcode without consulting the rate limiter
    pub async fn issue(&self, identity: &str, purpose: OtpPurpose) -> DomainResult<IssueResult> {
        self.issuer.issue(identity, purpose).await
    }

    /// Verify a submitted passcode
    pub async fn verify(
        &self,
        identity: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> DomainResult<VerifyOutcome> {
        self.verifier.verify(identity, code, purpose).await
    }

    /// Check whether a new passcode may be issued now
    pub async fn can_issue(&self, identity: &str, purpose: OtpPurpose) -> DomainResult<IssueAllowance> {
        self.rate_limiter.can_issue(identity, purpose).await
    }

    /// Rate-limited issuance: the limiter decides, then the issuer runs
    ///
    /// Two requests racing inside the same window may both pass the limiter;
    /// each then issues its own passcode and only the newest verifies.
    pub async fn request_code(
        &self,
        identity: &str,
        purpose: OtpPurpose,
    ) -> DomainResult<RequestCodeOutcome> {
        let allowance = self.rate_limiter.can_issue(identity, purpose).await?;
        if !allowance.allowed {
            return Ok(RequestCodeOutcome::RateLimited {
                wait_seconds: allowance.wait_seconds.unwrap_or(self.config.resend_cooldown_seconds),
            });
        }

        let issued = self.issuer.issue(identity, purpose).await?;
        Ok(RequestCodeOutcome::Issued(issued))
    }

    /// Report the state of the active passcode without mutating anything
    pub async fn status(&self, identity: &str, purpose: OtpPurpose) -> DomainResult<OtpStatus> {
        let normalized = normalize_identity(identity)?;
        let now = self.clock.now();

        let active = bounded(
            self.config.store_timeout,
            "query_latest",
            self.repository.find_latest_active(&normalized, purpose, now),
        )
        .await?;
        let allowance = self.rate_limiter.can_issue(&normalized, purpose).await?;

        Ok(OtpStatus {
            active: active.is_some(),
            expires_in_seconds: active
                .as_ref()
                .map(|record| record.time_until_expiration(now).num_seconds()),
            remaining_attempts: active.as_ref().map(|record| record.remaining_attempts()),
            can_resend: allowance.allowed,
            resend_wait_seconds: allowance.wait_seconds,
        })
    }

    /// Best-effort purge of stale records for one identity
    pub async fn cleanup(&self, identity: &str) -> CleanupResult {
        self.reaper.cleanup(identity).await
    }

    /// Shared handle to the reaper, for scheduling the sweep
    pub fn reaper(&self) -> Arc<OtpReaper<R>> {
        Arc::clone(&self.reaper)
    }

    pub fn config(&self) -> &OtpServiceConfig {
        &self.config
    }
}
