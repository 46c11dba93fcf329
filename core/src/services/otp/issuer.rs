//! Passcode issuance

use chrono::Duration;
use std::sync::Arc;
use uuid::Uuid;

use og_shared::utils::{is_valid_email, mask_email};

use crate::domain::entities::otp_record::{OtpPurpose, OtpRecord};
use crate::errors::{DomainError, DomainResult, ValidationError};
use crate::repositories::OtpRepository;

use super::clock::Clock;
use super::config::OtpServiceConfig;
use super::support::{bounded, normalize_identity};
use super::traits::{EmailServiceTrait, EmailTemplateParams};
use super::types::IssueResult;

/// Generates, stores and dispatches passcodes
pub struct OtpIssuer<R: OtpRepository, E: EmailServiceTrait> {
    repository: Arc<R>,
    email_service: Arc<E>,
    clock: Arc<dyn Clock>,
    config: OtpServiceConfig,
}

impl<R: OtpRepository, E: EmailServiceTrait> OtpIssuer<R, E> {
    pub fn new(
        repository: Arc<R>,
        email_service: Arc<E>,
        clock: Arc<dyn Clock>,
        config: OtpServiceConfig,
    ) -> Self {
        Self {
            repository,
            email_service,
            clock,
            config,
        }
    }

    /// Issue a new passcode for `identity` and `purpose`
    ///
    /// This method:
    /// 1. Normalizes and validates the email address
    /// 2. Generates a passcode and stores a fresh record
    /// 3. Dispatches the passcode through the email template
    /// 4. Deletes the record again if dispatch fails or times out, or if the
    ///    insert itself timed out
    ///
    /// Older unconsumed records for the same pair are left alone; only the
    /// newest one is ever selected for verification.
    ///
    /// # Returns
    ///
    /// * `Ok(IssueResult)` - The passcode was stored and handed to the provider
    /// * `Err(DomainError::Validation*)` - Malformed identity, nothing stored
    /// * `Err(DomainError::Storage | Timeout)` - Insert failed, nothing dispatched;
    ///   on timeout the possibly committed record is deleted
    /// * `Err(DomainError::Delivery)` - Dispatch failed, record rolled back
    pub async fn issue(&self, identity: &str, purpose: OtpPurpose) -> DomainResult<IssueResult> {
        let identity = normalize_identity(identity)?;
        if !is_valid_email(&identity) {
            return Err(ValidationError::InvalidEmail.into());
        }
        let masked = mask_email(&identity);

        let now = self.clock.now();
        let record = OtpRecord::new(
            identity,
            purpose,
            now,
            self.config.validity_minutes,
            self.config.max_attempts,
        );

        let record_id = record.id;
        let record = match bounded(
            self.config.store_timeout,
            "insert",
            self.repository.insert(record),
        )
        .await
        {
            Ok(stored) => stored,
            Err(e) => {
                tracing::error!(
                    identity = %masked,
                    purpose = %purpose,
                    error = %e,
                    event = "otp_storage_failed",
                    "Failed to store passcode record"
                );
                // a timed-out insert may still commit on the store side
                if matches!(e, DomainError::Timeout { .. }) {
                    self.rollback(record_id, &masked).await;
                }
                return Err(e);
            }
        };

        let params = EmailTemplateParams::for_record(&record, &self.config.app_name);
        let dispatch = tokio::time::timeout(
            self.config.dispatch_timeout,
            self.email_service
                .send_template(&self.config.email_template_id, &params),
        )
        .await;

        let message_id = match dispatch {
            Ok(Ok(message_id)) => message_id,
            Ok(Err(reason)) => {
                tracing::warn!(
                    identity = %masked,
                    purpose = %purpose,
                    error = %reason,
                    event = "otp_dispatch_failed",
                    "Email provider rejected passcode dispatch"
                );
                self.rollback(record.id, &masked).await;
                return Err(DomainError::Delivery { message: reason });
            }
            Err(_) => {
                tracing::warn!(
                    identity = %masked,
                    purpose = %purpose,
                    timeout_ms = self.config.dispatch_timeout.as_millis() as u64,
                    event = "otp_dispatch_failed",
                    "Passcode dispatch timed out"
                );
                self.rollback(record.id, &masked).await;
                return Err(DomainError::Delivery {
                    message: format!(
                        "Email dispatch timed out after {}ms",
                        self.config.dispatch_timeout.as_millis()
                    ),
                });
            }
        };

        tracing::info!(
            identity = %masked,
            purpose = %purpose,
            record_id = %record.id,
            message_id = %message_id,
            event = "otp_issued",
            "Issued passcode"
        );

        Ok(IssueResult {
            record_id: record.id,
            message_id,
            expires_at: record.expires_at,
            next_resend_at: record.created_at + Duration::seconds(self.config.resend_cooldown_seconds),
        })
    }

    /// Remove a record whose passcode was never delivered
    ///
    /// A failed rollback leaves a record nobody knows the code of; it expires
    /// and is reaped like any other.
    async fn rollback(&self, record_id: Uuid, masked: &str) {
        match bounded(
            self.config.store_timeout,
            "delete",
            self.repository.delete(record_id),
        )
        .await
        {
            Ok(_) => {
                tracing::info!(
                    identity = %masked,
                    record_id = %record_id,
                    event = "otp_rollback",
                    "Rolled back undelivered passcode"
                );
            }
            Err(e) => {
                tracing::error!(
                    identity = %masked,
                    record_id = %record_id,
                    error = %e,
                    event = "otp_rollback_failed",
                    "Failed to roll back undelivered passcode"
                );
            }
        }
    }
}
