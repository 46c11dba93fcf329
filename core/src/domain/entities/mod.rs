//! Domain entities representing core business objects.

pub mod otp_record;


// Re-export commonly used types
pub use otp_record::{
    OtpPurpose, OtpRecord, CODE_LENGTH, DEFAULT_VALIDITY_MINUTES, MAX_ATTEMPTS,
    VERIFIED_RETENTION_MINUTES,
};
