//! MySQL implementation of the OtpRepository trait.
//!
//! Every mutation is a single statement keyed by record id, so concurrent
//! service instances coordinate through the database alone.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use og_core::domain::entities::otp_record::{OtpPurpose, OtpRecord};
use og_core::errors::DomainError;
use og_core::repositories::{OtpRepository, OtpUpdate};

const SELECT_COLUMNS: &str = r#"
    SELECT id, identity, code, purpose, created_at, expires_at,
           attempts, max_attempts, verified, verified_at
    FROM otp_records
"#;

/// MySQL implementation of OtpRepository
pub struct MySqlOtpRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlOtpRepository {
    /// Create a new MySQL passcode repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn storage_error(context: &str, e: sqlx::Error) -> DomainError {
        DomainError::Storage {
            message: format!("{}: {}", context, e),
        }
    }

    /// Convert database row to OtpRecord entity
    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<OtpRecord, DomainError> {
        let column = |name: &str, e: sqlx::Error| DomainError::Internal {
            message: format!("Failed to get {}: {}", name, e),
        };

        let id: String = row.try_get("id").map_err(|e| column("id", e))?;
        let purpose: String = row.try_get("purpose").map_err(|e| column("purpose", e))?;

        Ok(OtpRecord {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid record UUID: {}", e),
            })?,
            identity: row.try_get("identity").map_err(|e| column("identity", e))?,
            code: row.try_get("code").map_err(|e| column("code", e))?,
            purpose: purpose.parse::<OtpPurpose>().map_err(|e| DomainError::Internal {
                message: format!("Invalid stored purpose: {}", e),
            })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| column("created_at", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| column("expires_at", e))?,
            attempts: row.try_get("attempts").map_err(|e| column("attempts", e))?,
            max_attempts: row.try_get("max_attempts").map_err(|e| column("max_attempts", e))?,
            verified: row.try_get("verified").map_err(|e| column("verified", e))?,
            verified_at: row
                .try_get::<Option<DateTime<Utc>>, _>("verified_at")
                .map_err(|e| column("verified_at", e))?,
        })
    }
}

#[async_trait]
impl OtpRepository for MySqlOtpRepository {
    async fn insert(&self, record: OtpRecord) -> Result<OtpRecord, DomainError> {
        let query = r#"
            INSERT INTO otp_records (
                id, identity, code, purpose, created_at, expires_at,
                attempts, max_attempts, verified, verified_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(record.id.to_string())
            .bind(&record.identity)
            .bind(&record.code)
            .bind(record.purpose.as_str())
            .bind(record.created_at)
            .bind(record.expires_at)
            .bind(record.attempts)
            .bind(record.max_attempts)
            .bind(record.verified)
            .bind(record.verified_at)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::storage_error("Failed to insert passcode record", e))?;

        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<OtpRecord>, DomainError> {
        let query = format!("{} WHERE id = ? LIMIT 1", SELECT_COLUMNS);

        let result = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::storage_error("Failed to find passcode record", e))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_latest_active(
        &self,
        identity: &str,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpRecord>, DomainError> {
        let query = format!(
            "{} WHERE identity = ? AND purpose = ? AND verified = FALSE AND expires_at > ? \
             ORDER BY created_at DESC, id DESC LIMIT 1",
            SELECT_COLUMNS
        );

        let result = sqlx::query(&query)
            .bind(identity)
            .bind(purpose.as_str())
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::storage_error("Failed to query latest passcode", e))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_created_since(
        &self,
        identity: &str,
        purpose: OtpPurpose,
        after: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<OtpRecord>, DomainError> {
        let query = format!(
            "{} WHERE identity = ? AND purpose = ? AND created_at > ? \
             ORDER BY created_at DESC, id DESC LIMIT ?",
            SELECT_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(identity)
            .bind(purpose.as_str())
            .bind(after)
            .bind(limit as u64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Self::storage_error("Failed to query recent passcodes", e))?;

        rows.iter().map(Self::row_to_record).collect()
    }

    async fn update(&self, id: Uuid, update: OtpUpdate) -> Result<bool, DomainError> {
        let result = match update {
            OtpUpdate::FailedAttempt { attempts } => {
                sqlx::query(
                    "UPDATE otp_records SET attempts = GREATEST(attempts, ?) WHERE id = ? AND verified = FALSE",
                )
                .bind(attempts)
                .bind(id.to_string())
                .execute(&self.pool)
                .await
            }
            OtpUpdate::Verified {
                attempts,
                verified_at,
            } => {
                sqlx::query(
                    r#"
                    UPDATE otp_records
                    SET verified = TRUE, verified_at = ?, attempts = GREATEST(attempts, ?)
                    WHERE id = ? AND verified = FALSE
                    "#,
                )
                .bind(verified_at)
                .bind(attempts)
                .bind(id.to_string())
                .execute(&self.pool)
                .await
            }
        }
        .map_err(|e| Self::storage_error("Failed to update passcode record", e))?;

        // sqlx connects with CLIENT_FOUND_ROWS, so a matched row counts even when GREATEST leaves it unchanged
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM otp_records WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| Self::storage_error("Failed to delete passcode record", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_stale(
        &self,
        identity: Option<&str>,
        now: DateTime<Utc>,
        verified_before: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let stale = "(expires_at < ? OR (verified = TRUE AND verified_at < ?))";

        let result = match identity {
            Some(identity) => {
                sqlx::query(&format!(
                    "DELETE FROM otp_records WHERE identity = ? AND {}",
                    stale
                ))
                .bind(identity)
                .bind(now)
                .bind(verified_before)
                .execute(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!("DELETE FROM otp_records WHERE {}", stale))
                    .bind(now)
                    .bind(verified_before)
                    .execute(&self.pool)
                    .await
            }
        }
        .map_err(|e| Self::storage_error("Failed to delete stale passcodes", e))?;

        Ok(result.rows_affected())
    }
}
