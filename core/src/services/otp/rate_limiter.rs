//! Issuance rate limiting backed by the record store
//!
//! The window is derived from the newest record's `created_at`, so there is no
//! counter state to keep in process and nothing to reset.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use og_shared::utils::mask_email;

use crate::domain::entities::otp_record::OtpPurpose;
use crate::errors::DomainResult;
use crate::repositories::OtpRepository;

use super::clock::Clock;
use super::config::OtpServiceConfig;
use super::support::{bounded, normalize_identity};
use super::types::IssueAllowance;

/// Decides whether a new passcode may be issued for an identity and purpose
pub struct OtpRateLimiter<R: OtpRepository> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    config: OtpServiceConfig,
}

impl<R: OtpRepository> OtpRateLimiter<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>, config: OtpServiceConfig) -> Self {
        Self {
            repository,
            clock,
            config,
        }
    }

    /// Check whether a new passcode may be issued now
    ///
    /// A store failure fails open: the request is allowed and a warning is
    /// logged. Only an empty identity is returned as an error.
    pub async fn can_issue(&self, identity: &str, purpose: OtpPurpose) -> DomainResult<IssueAllowance> {
        let identity = normalize_identity(identity)?;
        let now = self.clock.now();
        let window_start = now - Duration::seconds(self.config.resend_cooldown_seconds);

        let latest = bounded(
            self.config.store_timeout,
            "query_range",
            self.repository.find_latest_since(&identity, purpose, window_start),
        )
        .await;

        match latest {
            Ok(Some(record)) => {
                let wait = wait_seconds(now, record.created_at, self.config.resend_cooldown_seconds);
                tracing::info!(
                    identity = %mask_email(&identity),
                    purpose = %purpose,
                    wait_seconds = wait,
                    event = "otp_rate_limited",
                    "Passcode request inside cooldown window"
                );
                Ok(IssueAllowance::wait(wait))
            }
            Ok(None) => Ok(IssueAllowance::allowed()),
            Err(e) => {
                tracing::warn!(
                    identity = %mask_email(&identity),
                    purpose = %purpose,
                    error = %e,
                    event = "rate_limit_fail_open",
                    "Rate limit check failed, allowing request"
                );
                Ok(IssueAllowance::allowed())
            }
        }
    }
}

/// Whole seconds until `created_at + window`, rounded up and kept within `[0, window]`
pub(crate) fn wait_seconds(now: DateTime<Utc>, created_at: DateTime<Utc>, window_seconds: i64) -> i64 {
    let window_ms = window_seconds.saturating_mul(1000);
    let elapsed_ms = (now - created_at).num_milliseconds();
    let remaining_ms = window_ms.saturating_sub(elapsed_ms).clamp(0, window_ms);
    (remaining_ms + 999) / 1000
}
