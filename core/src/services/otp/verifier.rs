//! Passcode verification

use std::sync::Arc;

use og_shared::utils::mask_email;

use crate::domain::entities::otp_record::OtpPurpose;
use crate::errors::DomainResult;
use crate::repositories::{OtpRepository, OtpUpdate};

use super::clock::Clock;
use super::config::OtpServiceConfig;
use super::support::{bounded, normalize_identity};
use super::types::VerifyOutcome;

/// Checks submitted passcodes against the newest eligible record
pub struct OtpVerifier<R: OtpRepository> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    config: OtpServiceConfig,
}

impl<R: OtpRepository> OtpVerifier<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>, config: OtpServiceConfig) -> Self {
        Self {
            repository,
            clock,
            config,
        }
    }

    /// Verify a submitted passcode
    ///
    /// This method:
    /// 1. Selects the newest unverified, unexpired record for the pair
    /// 2. Refuses without mutation once the attempt ceiling is reached
    /// 3. Compares the passcode in constant time
    /// 4. Persists the incremented attempt counter, or consumes the record
    ///
    /// A successful guess counts as an attempt. Verifying the same passcode a
    /// second time finds no eligible record and gets the generic rejection.
    ///
    /// # Returns
    ///
    /// * `Ok(VerifyOutcome)` - Verified, or a policy rejection
    /// * `Err(DomainError)` - Empty identity, or a store failure (retryable)
    pub async fn verify(
        &self,
        identity: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> DomainResult<VerifyOutcome> {
        let identity = normalize_identity(identity)?;
        let code = code.trim();
        let masked = mask_email(&identity);
        let now = self.clock.now();

        let record = bounded(
            self.config.store_timeout,
            "query_latest",
            self.repository.find_latest_active(&identity, purpose, now),
        )
        .await
        .map_err(|e| {
            tracing::error!(
                identity = %masked,
                purpose = %purpose,
                error = %e,
                event = "otp_verification_error",
                "Failed to load passcode record"
            );
            e
        })?;

        let Some(record) = record else {
            tracing::warn!(
                identity = %masked,
                purpose = %purpose,
                event = "otp_verification_failed",
                reason = "no_active_code",
                "No active passcode for identity"
            );
            return Ok(VerifyOutcome::InvalidOrExpired);
        };

        if record.is_exhausted() {
            tracing::warn!(
                identity = %masked,
                purpose = %purpose,
                record_id = %record.id,
                event = "otp_max_attempts",
                "Passcode attempt ceiling already reached"
            );
            return Ok(VerifyOutcome::MaxAttemptsExceeded);
        }

        let attempts = record.attempts + 1;

        if !record.matches_code(code) {
            let counted = bounded(
                self.config.store_timeout,
                "update",
                self.repository
                    .update(record.id, OtpUpdate::FailedAttempt { attempts }),
            )
            .await?;

            if !counted {
                // consumed or reaped since it was loaded
                tracing::warn!(
                    identity = %masked,
                    purpose = %purpose,
                    record_id = %record.id,
                    event = "otp_verification_failed",
                    reason = "record_gone",
                    "Passcode no longer active"
                );
                return Ok(VerifyOutcome::InvalidOrExpired);
            }

            let remaining = (record.max_attempts - attempts).max(0);
            tracing::warn!(
                identity = %masked,
                purpose = %purpose,
                record_id = %record.id,
                remaining_attempts = remaining,
                event = "otp_verification_failed",
                reason = "wrong_code",
                "Passcode mismatch"
            );

            if remaining > 0 {
                return Ok(VerifyOutcome::InvalidCode {
                    remaining_attempts: remaining,
                });
            }

            tracing::warn!(
                identity = %masked,
                purpose = %purpose,
                record_id = %record.id,
                event = "otp_max_attempts",
                "Passcode attempt ceiling reached"
            );
            return Ok(VerifyOutcome::MaxAttemptsExceeded);
        }

        let consumed = bounded(
            self.config.store_timeout,
            "update",
            self.repository.update(
                record.id,
                OtpUpdate::Verified {
                    attempts,
                    verified_at: now,
                },
            ),
        )
        .await?;

        if !consumed {
            // a concurrent verify consumed it first
            tracing::warn!(
                identity = %masked,
                purpose = %purpose,
                record_id = %record.id,
                event = "otp_verification_failed",
                reason = "already_consumed",
                "Passcode consumed concurrently"
            );
            return Ok(VerifyOutcome::InvalidOrExpired);
        }

        tracing::info!(
            identity = %masked,
            purpose = %purpose,
            record_id = %record.id,
            attempts = attempts,
            event = "otp_verified",
            "Passcode verified"
        );

        Ok(VerifyOutcome::Verified)
    }
}
