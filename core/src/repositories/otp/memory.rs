//! In-process implementation of OtpRepository
//!
//! Records live in a single arena vector; every query filters the arena and
//! sorts candidates explicitly, so no behaviour depends on insertion order.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::otp_record::{OtpPurpose, OtpRecord};
use crate::errors::DomainError;

use super::r#trait::{OtpRepository, OtpUpdate};

/// In-memory passcode store for development, single-node deployments and tests
#[derive(Clone, Default)]
pub struct InMemoryOtpRepository {
    records: Arc<RwLock<Vec<OtpRecord>>>,
}

impl InMemoryOtpRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, regardless of state
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Snapshot of every record for `identity`, newest first
    pub async fn records_for(&self, identity: &str) -> Vec<OtpRecord> {
        let records = self.records.read().await;
        let mut matching: Vec<OtpRecord> = records
            .iter()
            .filter(|r| r.identity == identity)
            .cloned()
            .collect();
        matching.sort_by(newest_first);
        matching
    }
}

/// created_at descending, then id descending
fn newest_first(a: &OtpRecord, b: &OtpRecord) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

#[async_trait]
impl OtpRepository for InMemoryOtpRepository {
    async fn insert(&self, record: OtpRecord) -> Result<OtpRecord, DomainError> {
        let mut records = self.records.write().await;

        if records.iter().any(|r| r.id == record.id) {
            return Err(DomainError::Storage {
                message: format!("Record {} already exists", record.id),
            });
        }

        records.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<OtpRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn find_latest_active(
        &self,
        identity: &str,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.identity == identity && r.purpose == purpose)
            .filter(|r| !r.verified && r.expires_at > now)
            .min_by(|a, b| newest_first(a, b))
            .cloned())
    }

    async fn find_created_since(
        &self,
        identity: &str,
        purpose: OtpPurpose,
        after: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<OtpRecord>, DomainError> {
        let records = self.records.read().await;
        let mut matching: Vec<OtpRecord> = records
            .iter()
            .filter(|r| r.identity == identity && r.purpose == purpose && r.created_at > after)
            .cloned()
            .collect();
        matching.sort_by(newest_first);
        matching.truncate(limit);
        Ok(matching)
    }

    async fn update(&self, id: Uuid, update: OtpUpdate) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;

        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };

        match update {
            OtpUpdate::FailedAttempt { attempts } => {
                if record.verified {
                    return Ok(false);
                }
                record.attempts = record.attempts.max(attempts);
                Ok(true)
            }
            OtpUpdate::Verified { attempts, verified_at } => {
                if record.verified {
                    return Ok(false);
                }
                record.attempts = record.attempts.max(attempts);
                record.verified = true;
                record.verified_at = Some(verified_at);
                Ok(true)
            }
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() < before)
    }

    async fn delete_stale(
        &self,
        identity: Option<&str>,
        now: DateTime<Utc>,
        verified_before: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let mut records = self.records.write().await;
        let before = records.len();

        records.retain(|r| {
            let in_scope = identity.map_or(true, |id| r.identity == id);
            !(in_scope && r.is_stale_at(now, verified_before))
        });

        Ok((before - records.len()) as u64)
    }
}
