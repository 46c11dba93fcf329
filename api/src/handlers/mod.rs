pub mod error;

pub use error::{handle_domain_error, rate_limited, validation_failed, verify_rejection};
