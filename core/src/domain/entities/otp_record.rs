//! One-time passcode record entity for email-based verification.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ValidationError;

/// Length of the passcode
pub const CODE_LENGTH: usize = 6;

/// Maximum number of verification attempts allowed per passcode
pub const MAX_ATTEMPTS: i32 = 5;

/// Default validity window for passcodes (10 minutes)
pub const DEFAULT_VALIDITY_MINUTES: i64 = 10;

/// How long a verified record is retained before it becomes reapable (1 hour)
pub const VERIFIED_RETENTION_MINUTES: i64 = 60;

/// Workflow a passcode is scoped to. Codes are never valid across purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    PasswordReset,
    EmailVerification,
}

impl OtpPurpose {
    /// Storage / wire tag
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpPurpose::PasswordReset => "password_reset",
            OtpPurpose::EmailVerification => "email_verification",
        }
    }

    /// Human-readable label substituted into the email template
    pub fn label(&self) -> &'static str {
        match self {
            OtpPurpose::PasswordReset => "Password Reset",
            OtpPurpose::EmailVerification => "Email Verification",
        }
    }
}

impl std::fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OtpPurpose {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "password_reset" => Ok(OtpPurpose::PasswordReset),
            "email_verification" => Ok(OtpPurpose::EmailVerification),
            other => Err(ValidationError::UnknownPurpose {
                purpose: other.to_string(),
            }),
        }
    }
}

/// A single issued passcode and its verification state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Unique identifier, assigned at creation
    pub id: Uuid,

    /// Normalized (trimmed, lowercased) email address
    pub identity: String,

    /// The zero-padded numeric passcode
    pub code: String,

    /// Workflow this passcode belongs to
    pub purpose: OtpPurpose,

    /// Timestamp when the record was inserted
    pub created_at: DateTime<Utc>,

    /// Timestamp after which the passcode is rejected
    pub expires_at: DateTime<Utc>,

    /// Verification attempts made so far, including a successful one
    pub attempts: i32,

    /// Attempt ceiling fixed at creation
    pub max_attempts: i32,

    /// Whether the passcode has been consumed
    pub verified: bool,

    /// When the passcode was consumed
    pub verified_at: Option<DateTime<Utc>>,
}

impl OtpRecord {
    /// Creates a fresh record with a newly generated passcode
    ///
    /// `identity` must already be normalized.
    pub fn new(
        identity: String,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
        validity_minutes: i64,
        max_attempts: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            identity,
            code: Self::generate_code(),
            purpose,
            created_at: now,
            expires_at: now + Duration::minutes(validity_minutes),
            attempts: 0,
            max_attempts,
            verified: false,
            verified_at: None,
        }
    }

    /// Generates a passcode of `CODE_LENGTH` digits
    ///
    /// Each digit is drawn independently and uniformly from 0-9 using the OS
    /// CSPRNG, so leading zeros occur at their natural rate.
    pub fn generate_code() -> String {
        let mut rng = OsRng;
        (0..CODE_LENGTH)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    }

    /// Checks if the passcode has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Whether this record can still be picked for verification at `now`
    pub fn is_eligible_at(&self, now: DateTime<Utc>) -> bool {
        !self.verified && !self.is_expired_at(now)
    }

    /// Whether the attempt ceiling has been reached
    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }

    /// Gets the number of remaining verification attempts (0 if exhausted)
    pub fn remaining_attempts(&self) -> i32 {
        (self.max_attempts - self.attempts).max(0)
    }

    /// Compares a submitted code against the stored one in constant time
    pub fn matches_code(&self, submitted: &str) -> bool {
        self.code.len() == submitted.len() && constant_time_eq(self.code.as_bytes(), submitted.as_bytes())
    }

    /// Whether the reaper may delete this record
    ///
    /// Expired records are always reapable. Verified records are kept until
    /// their verification is older than `verified_before`.
    pub fn is_stale_at(&self, now: DateTime<Utc>, verified_before: DateTime<Utc>) -> bool {
        if self.expires_at < now {
            return true;
        }
        matches!(self.verified_at, Some(at) if self.verified && at < verified_before)
    }

    /// Gets the time remaining until expiration, or zero if expired
    pub fn time_until_expiration(&self, now: DateTime<Utc>) -> Duration {
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}
