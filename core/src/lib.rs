//! # OtpGate Core
//!
//! Core business logic and domain layer for the OtpGate backend.
//! This crate contains the passcode record entity, the issuer, verifier,
//! rate limiter and reaper services, the repository interface with an
//! in-memory implementation, and error types.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
