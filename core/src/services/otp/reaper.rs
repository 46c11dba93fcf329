//! Purging of expired and long-verified passcode records
//!
//! Runs out of band: per identity on demand, and across all identities on an
//! interval. Failures are logged and never propagated.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};

use og_shared::utils::{mask_email, normalize_email};

use crate::repositories::OtpRepository;

use super::clock::Clock;
use super::config::OtpServiceConfig;
use super::support::bounded;
use super::types::CleanupResult;

/// Service for cleaning up stale passcode records
pub struct OtpReaper<R: OtpRepository + 'static> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    config: OtpServiceConfig,
}

impl<R: OtpRepository + 'static> OtpReaper<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>, config: OtpServiceConfig) -> Self {
        Self {
            repository,
            clock,
            config,
        }
    }

    /// Delete stale records for one identity
    ///
    /// A record is stale once it has expired, or once it was verified longer
    /// ago than the retention window.
    pub async fn cleanup(&self, identity: &str) -> CleanupResult {
        let identity = normalize_email(identity);
        if identity.is_empty() {
            warn!(event = "otp_reap_skipped", "Cleanup requested without an identity");
            return CleanupResult::default();
        }

        let masked = mask_email(&identity);
        self.purge(Some(&identity), &masked).await
    }

    /// Delete stale records for every identity
    pub async fn sweep(&self) -> CleanupResult {
        self.purge(None, "*").await
    }

    async fn purge(&self, identity: Option<&str>, scope: &str) -> CleanupResult {
        let now = self.clock.now();
        let verified_before = self.verified_cutoff(now);
        let mut result = CleanupResult::default();

        match bounded(
            self.config.store_timeout,
            "delete_stale",
            self.repository.delete_stale(identity, now, verified_before),
        )
        .await
        {
            Ok(count) => {
                result.records_deleted = count;
                if count > 0 {
                    info!(
                        identity = %scope,
                        deleted = count,
                        event = "otp_reaped",
                        "Deleted stale passcode records"
                    );
                }
            }
            Err(e) => {
                error!(
                    identity = %scope,
                    error = %e,
                    event = "otp_reap_failed",
                    "Failed to delete stale passcode records"
                );
                result.errors.push(format!("Passcode cleanup error: {}", e));
            }
        }

        result
    }

    fn verified_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::minutes(self.config.verified_retention_minutes)
    }

    /// Start the scheduled sweep as a background task
    ///
    /// This spawns a tokio task that sweeps at the configured interval. A zero
    /// interval disables the task.
    pub fn start_background_task(self: Arc<Self>) {
        if self.config.reaper_interval.is_zero() {
            warn!("Passcode reaper is disabled");
            return;
        }

        let interval = self.config.reaper_interval;

        tokio::spawn(async move {
            info!(
                "Passcode reaper started - will run every {} seconds",
                interval.as_secs()
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                let result = self.sweep().await;
                if !result.is_success() {
                    warn!("Passcode sweep completed with errors: {:?}", result.errors);
                }
            }
        });
    }
}
