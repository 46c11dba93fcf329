//! Mock implementation of OtpRepository for testing
//!
//! Wraps the in-memory store and lets a test fail or stall individual
//! operation groups.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::entities::otp_record::{OtpPurpose, OtpRecord};
use crate::errors::DomainError;

use super::memory::InMemoryOtpRepository;
use super::r#trait::{OtpRepository, OtpUpdate};

/// Mock passcode repository for testing
#[derive(Clone, Default)]
pub struct MockOtpRepository {
    inner: InMemoryOtpRepository,
    fail_inserts: Arc<AtomicBool>,
    fail_queries: Arc<AtomicBool>,
    fail_updates: Arc<AtomicBool>,
    fail_deletes: Arc<AtomicBool>,
    delay_ms: Arc<AtomicU64>,
    insert_ack_delay_ms: Arc<AtomicU64>,
    vanish_on_update: Arc<AtomicBool>,
    delete_calls: Arc<AtomicUsize>,
}

impl MockOtpRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Access the wrapped store directly, bypassing injected faults
    pub fn store(&self) -> &InMemoryOtpRepository {
        &self.inner
    }

    pub fn set_fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Stall every call by `delay` before it touches the store
    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Commit inserts immediately but hold back the acknowledgement by `delay`
    pub fn set_insert_ack_delay(&self, delay: Duration) {
        self.insert_ack_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Delete the target record just before an update reaches the store
    pub fn set_vanish_on_update(&self, vanish: bool) {
        self.vanish_on_update.store(vanish, Ordering::SeqCst);
    }

    /// Number of single-record deletes attempted
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    async fn before_call(&self, flag: &AtomicBool, operation: &str) -> Result<(), DomainError> {
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        if flag.load(Ordering::SeqCst) {
            return Err(DomainError::Storage {
                message: format!("Mock {} failure", operation),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl OtpRepository for MockOtpRepository {
    async fn insert(&self, record: OtpRecord) -> Result<OtpRecord, DomainError> {
        self.before_call(&self.fail_inserts, "insert").await?;
        let stored = self.inner.insert(record).await?;

        let ack_delay = self.insert_ack_delay_ms.load(Ordering::SeqCst);
        if ack_delay > 0 {
            tokio::time::sleep(Duration::from_millis(ack_delay)).await;
        }
        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<OtpRecord>, DomainError> {
        self.before_call(&self.fail_queries, "query").await?;
        self.inner.find_by_id(id).await
    }

    async fn find_latest_active(
        &self,
        identity: &str,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpRecord>, DomainError> {
        self.before_call(&self.fail_queries, "query").await?;
        self.inner.find_latest_active(identity, purpose, now).await
    }

    async fn find_created_since(
        &self,
        identity: &str,
        purpose: OtpPurpose,
        after: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<OtpRecord>, DomainError> {
        self.before_call(&self.fail_queries, "query").await?;
        self.inner.find_created_since(identity, purpose, after, limit).await
    }

    async fn update(&self, id: Uuid, update: OtpUpdate) -> Result<bool, DomainError> {
        self.before_call(&self.fail_updates, "update").await?;
        if self.vanish_on_update.load(Ordering::SeqCst) {
            self.inner.delete(id).await?;
        }
        self.inner.update(id, update).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.before_call(&self.fail_deletes, "delete").await?;
        self.inner.delete(id).await
    }

    async fn delete_stale(
        &self,
        identity: Option<&str>,
        now: DateTime<Utc>,
        verified_before: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        self.before_call(&self.fail_deletes, "delete").await?;
        self.inner.delete_stale(identity, now, verified_before).await
    }
}
