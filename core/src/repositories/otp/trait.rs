//! Passcode repository trait defining the interface for record persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::otp_record::{OtpPurpose, OtpRecord};
use crate::errors::DomainError;

/// Mutation applied to a single record, keyed by its id
///
/// Each variant must be executed by implementations as one atomic statement;
/// the service layer never performs a read-modify-write across two calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpUpdate {
    /// Record a failed guess. The stored counter is raised to `attempts`
    /// and never lowered.
    FailedAttempt { attempts: i32 },
    /// Consume the passcode. Applies only while the record is unverified.
    Verified {
        attempts: i32,
        verified_at: DateTime<Utc>,
    },
}

/// Repository trait for passcode record persistence operations
///
/// Implementations must order candidate records by `created_at` descending and
/// break ties by `id` descending, so selection is deterministic when two
/// records share a timestamp.
#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Insert a new record
    ///
    /// # Returns
    /// * `Ok(OtpRecord)` - The stored record
    /// * `Err(DomainError)` - Insert failed (e.g., duplicate id, store unavailable)
    async fn insert(&self, record: OtpRecord) -> Result<OtpRecord, DomainError>;

    /// Find a record by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<OtpRecord>, DomainError>;

    /// Find the single most recent record for `(identity, purpose)` that is
    /// unverified and has `expires_at > now`
    ///
    /// # Returns
    /// * `Ok(Some(OtpRecord))` - The eligible record
    /// * `Ok(None)` - Nothing eligible (none issued, all expired, or all verified)
    /// * `Err(DomainError)` - Query failed
    async fn find_latest_active(
        &self,
        identity: &str,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpRecord>, DomainError>;

    /// Find records for `(identity, purpose)` created strictly after `after`,
    /// newest first, at most `limit` of them
    async fn find_created_since(
        &self,
        identity: &str,
        purpose: OtpPurpose,
        after: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<OtpRecord>, DomainError>;

    /// Apply a single-record update
    ///
    /// # Returns
    /// * `Ok(true)` - The update was applied
    /// * `Ok(false)` - No record matched (unknown id, or already verified)
    /// * `Err(DomainError)` - Update failed
    async fn update(&self, id: Uuid, update: OtpUpdate) -> Result<bool, DomainError>;

    /// Delete a record by id
    ///
    /// # Returns
    /// * `Ok(true)` - The record was deleted
    /// * `Ok(false)` - No record with this id
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Delete stale records: `expires_at < now`, or verified with
    /// `verified_at < verified_before`
    ///
    /// When `identity` is `None` the purge spans every identity.
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of records deleted
    async fn delete_stale(
        &self,
        identity: Option<&str>,
        now: DateTime<Utc>,
        verified_before: DateTime<Utc>,
    ) -> Result<u64, DomainError>;

    /// Find the most recent record for `(identity, purpose)` created after `after`
    async fn find_latest_since(
        &self,
        identity: &str,
        purpose: OtpPurpose,
        after: DateTime<Utc>,
    ) -> Result<Option<OtpRecord>, DomainError> {
        let mut records = self.find_created_since(identity, purpose, after, 1).await?;
        Ok(if records.is_empty() { None } else { Some(records.swap_remove(0)) })
    }
}
