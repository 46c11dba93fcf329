pub mod otp;

pub use otp::{InMemoryOtpRepository, OtpRepository, OtpUpdate};

#[cfg(test)]
pub use otp::MockOtpRepository;
