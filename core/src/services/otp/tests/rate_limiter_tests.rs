//! Tests for issuance rate limiting

use chrono::Duration;

use crate::domain::entities::otp_record::OtpPurpose;
use crate::services::otp::rate_limiter::wait_seconds;
use crate::services::otp::{IssueAllowance, RequestCodeOutcome};

use super::mocks::{t0, Fixture};

#[tokio::test]
async fn test_allowed_without_history() {
    let fx = Fixture::new();

    let allowance = fx
        .service
        .can_issue("user@example.com", OtpPurpose::PasswordReset)
        .await
        .unwrap();

    assert_eq!(allowance, IssueAllowance::allowed());
    assert!(allowance.message().is_none());
}

#[tokio::test]
async fn test_window_after_issue() {
    let fx = Fixture::new();
    fx.service
        .issue("user@example.com", OtpPurpose::PasswordReset)
        .await
        .unwrap();

    let immediately = fx
        .service
        .can_issue("user@example.com", OtpPurpose::PasswordReset)
        .await
        .unwrap();
    assert!(!immediately.allowed);
    assert_eq!(immediately.wait_seconds, Some(60));
    assert_eq!(
        immediately.message().as_deref(),
        Some("Please wait 60 seconds before requesting a new code")
    );

    fx.clock.advance(Duration::milliseconds(30_500));
    let halfway = fx
        .service
        .can_issue("user@example.com", OtpPurpose::PasswordReset)
        .await
        .unwrap();
    assert_eq!(halfway.wait_seconds, Some(30));

    fx.clock.set(t0() + Duration::seconds(61));
    let later = fx
        .service
        .can_issue("user@example.com", OtpPurpose::PasswordReset)
        .await
        .unwrap();
    assert!(later.allowed);
}

#[tokio::test]
async fn test_window_boundary_is_exclusive() {
    let fx = Fixture::new();
    fx.service
        .issue("user@example.com", OtpPurpose::PasswordReset)
        .await
        .unwrap();

    fx.clock.set(t0() + Duration::milliseconds(59_999));
    let inside = fx
        .service
        .can_issue("user@example.com", OtpPurpose::PasswordReset)
        .await
        .unwrap();
    assert_eq!(inside.wait_seconds, Some(1));

    fx.clock.set(t0() + Duration::seconds(60));
    let at_edge = fx
        .service
        .can_issue("user@example.com", OtpPurpose::PasswordReset)
        .await
        .unwrap();
    assert!(at_edge.allowed);
}

#[tokio::test]
async fn test_purposes_are_limited_independently() {
    let fx = Fixture::new();
    fx.service
        .issue("user@example.com", OtpPurpose::PasswordReset)
        .await
        .unwrap();

    let other = fx
        .service
        .can_issue("User@Example.com", OtpPurpose::EmailVerification)
        .await
        .unwrap();
    assert!(other.allowed);
}

#[tokio::test]
async fn test_fails_open_on_storage_error() {
    let fx = Fixture::new();
    fx.service
        .issue("user@example.com", OtpPurpose::PasswordReset)
        .await
        .unwrap();
    fx.repository.set_fail_queries(true);

    let allowance = fx
        .service
        .can_issue("user@example.com", OtpPurpose::PasswordReset)
        .await
        .unwrap();
    assert!(allowance.allowed);
}

#[tokio::test(start_paused = true)]
async fn test_fails_open_on_timeout() {
    let fx = Fixture::new();
    fx.repository.set_delay(std::time::Duration::from_secs(5));

    let allowance = fx
        .service
        .can_issue("user@example.com", OtpPurpose::PasswordReset)
        .await
        .unwrap();
    assert!(allowance.allowed);
}

#[tokio::test]
async fn test_empty_identity_rejected() {
    let fx = Fixture::new();
    assert!(fx
        .service
        .can_issue("  ", OtpPurpose::PasswordReset)
        .await
        .is_err());
}

#[tokio::test]
async fn test_request_code_is_gated() {
    let fx = Fixture::new();

    let first = fx
        .service
        .request_code("user@example.com", OtpPurpose::PasswordReset)
        .await
        .unwrap();
    assert!(matches!(first, RequestCodeOutcome::Issued(_)));

    fx.clock.advance(Duration::seconds(10));
    let second = fx
        .service
        .request_code("user@example.com", OtpPurpose::PasswordReset)
        .await
        .unwrap();
    assert!(matches!(second, RequestCodeOutcome::RateLimited { wait_seconds: 50 }));
    assert_eq!(fx.email.sent_count().await, 1);
    assert_eq!(fx.repository.store().len().await, 1);
}

#[test]
fn test_wait_seconds_rounding_and_clamping() {
    let now = t0();
    assert_eq!(wait_seconds(now, now, 60), 60);
    assert_eq!(wait_seconds(now, now - Duration::milliseconds(1), 60), 60);
    assert_eq!(wait_seconds(now, now - Duration::seconds(59), 60), 1);
    assert_eq!(wait_seconds(now, now - Duration::seconds(90), 60), 0);
    // a record stamped ahead of the clock never asks for more than the window
    assert_eq!(wait_seconds(now, now + Duration::seconds(30), 60), 60);
}
