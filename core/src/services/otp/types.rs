//! Types for passcode service results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Result of issuing a passcode
#[derive(Debug, Clone)]
pub struct IssueResult {
    /// Id of the stored record
    pub record_id: Uuid,
    /// Message id returned by the email provider
    pub message_id: String,
    /// When the passcode stops being accepted
    pub expires_at: DateTime<Utc>,
    /// When the caller may request another passcode
    pub next_resend_at: DateTime<Utc>,
}

impl IssueResult {
    pub fn message(&self) -> &'static str {
        "Verification code sent"
    }
}

/// Result of a verification attempt
///
/// Every variant other than `Verified` is a policy rejection, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// The passcode matched and has been consumed
    Verified,
    /// No eligible passcode exists for the identity and purpose
    InvalidOrExpired,
    /// Wrong passcode; further guesses remain
    InvalidCode { remaining_attempts: i32 },
    /// The attempt ceiling has been reached
    MaxAttemptsExceeded,
}

impl VerifyOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, VerifyOutcome::Verified)
    }

    /// User-facing message for this outcome
    pub fn message(&self) -> String {
        match self {
            VerifyOutcome::Verified => "Code verified successfully".to_string(),
            VerifyOutcome::InvalidOrExpired => "Invalid or expired code".to_string(),
            VerifyOutcome::InvalidCode { remaining_attempts: 1 } => {
                "Invalid code. 1 attempt remaining".to_string()
            }
            VerifyOutcome::InvalidCode { remaining_attempts } => {
                format!("Invalid code. {} attempts remaining", remaining_attempts)
            }
            VerifyOutcome::MaxAttemptsExceeded => {
                "Maximum attempts exceeded. Please request a new code".to_string()
            }
        }
    }

    pub fn remaining_attempts(&self) -> Option<i32> {
        match self {
            VerifyOutcome::InvalidCode { remaining_attempts } => Some(*remaining_attempts),
            VerifyOutcome::MaxAttemptsExceeded => Some(0),
            _ => None,
        }
    }
}

/// Rate limiter decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueAllowance {
    /// Whether a new passcode may be issued now
    pub allowed: bool,
    /// Whole seconds until issuance is allowed again
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_seconds: Option<i64>,
}

impl IssueAllowance {
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            wait_seconds: None,
        }
    }

    pub fn wait(seconds: i64) -> Self {
        Self {
            allowed: false,
            wait_seconds: Some(seconds),
        }
    }

    pub fn message(&self) -> Option<String> {
        self.wait_seconds.map(|seconds| {
            format!("Please wait {} seconds before requesting a new code", seconds)
        })
    }
}

/// Result of a rate-limited issuance request
#[derive(Debug, Clone)]
pub enum RequestCodeOutcome {
    Issued(IssueResult),
    RateLimited { wait_seconds: i64 },
}

/// Snapshot of the active passcode for an identity and purpose
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpStatus {
    /// Whether an unverified, unexpired passcode exists
    pub active: bool,
    /// Seconds until the active passcode expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_seconds: Option<i64>,
    /// Guesses left on the active passcode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_attempts: Option<i32>,
    /// Whether a new passcode may be requested now
    pub can_resend: bool,
    /// Seconds until a new passcode may be requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resend_wait_seconds: Option<i64>,
}

/// Result of a cleanup operation
#[derive(Debug, Default)]
pub struct CleanupResult {
    /// Number of records deleted
    pub records_deleted: u64,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupResult {
    /// Check if the cleanup was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
