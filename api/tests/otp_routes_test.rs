//! Integration tests for the passcode endpoints
//!
//! The app runs against the in-memory store and the mock email provider, so
//! the issued code is read straight from the store.

use actix_web::http::StatusCode;
use actix_web::{test, web};
use serde_json::{json, Value};
use std::sync::Arc;

use og_api::{create_app, AppState};
use og_core::repositories::InMemoryOtpRepository;
use og_core::services::otp::{OtpService, OtpServiceConfig};
use og_infra::email::{EmailServiceAdapter, MockEmailService};

const EMAIL: &str = "user@example.com";

struct Harness {
    state: web::Data<AppState<InMemoryOtpRepository, EmailServiceAdapter>>,
    repository: Arc<InMemoryOtpRepository>,
    email: MockEmailService,
}

impl Harness {
    fn new() -> Self {
        let repository = Arc::new(InMemoryOtpRepository::new());
        let email = MockEmailService::with_options(false, false);
        let adapter = Arc::new(EmailServiceAdapter::new(Box::new(email.clone())));
        let service = OtpService::new(Arc::clone(&repository), adapter, OtpServiceConfig::default());

        Self {
            state: web::Data::new(AppState::new(Arc::new(service))),
            repository,
            email,
        }
    }

    async fn issued_code(&self) -> String {
        let records = self.repository.records_for(EMAIL).await;
        records
            .into_iter()
            .max_by_key(|record| record.created_at)
            .map(|record| record.code)
            .expect("a passcode was issued")
    }
}

fn wrong_code(code: &str) -> &'static str {
    if code == "000000" {
        "111111"
    } else {
        "000000"
    }
}

fn request_body(purpose: &str) -> Value {
    json!({ "email": EMAIL, "purpose": purpose })
}

fn verify_body(code: &str) -> Value {
    json!({ "email": EMAIL, "code": code, "purpose": "password_reset" })
}

#[actix_web::test]
async fn test_health_check() {
    let harness = Harness::new();
    let app = test::init_service(create_app(harness.state.clone())).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_request_code_then_rate_limited() {
    let harness = Harness::new();
    let app = test::init_service(create_app(harness.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/request")
        .set_json(request_body("password_reset"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["message"], "Verification code sent");
    let resend_after = body["data"]["resend_after"].as_i64().unwrap();
    assert!((59..=60).contains(&resend_after));
    assert_eq!(harness.email.get_message_count(), 1);

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/request")
        .set_json(request_body("password_reset"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().contains_key("Retry-After"));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "RATE_LIMIT_EXCEEDED");
    assert_eq!(harness.email.get_message_count(), 1);
}

#[actix_web::test]
async fn test_rate_limit_is_per_purpose() {
    let harness = Harness::new();
    let app = test::init_service(create_app(harness.state.clone())).await;

    for purpose in ["password_reset", "email_verification"] {
        let req = test::TestRequest::post()
            .uri("/api/v1/otp/request")
            .set_json(request_body(purpose))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "purpose {}", purpose);
    }
}

#[actix_web::test]
async fn test_request_code_rejects_bad_input() {
    let harness = Harness::new();
    let app = test::init_service(create_app(harness.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/request")
        .set_json(json!({ "email": "not-an-email", "purpose": "password_reset" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["details"]["fields"]["email"].is_array());

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/request")
        .set_json(request_body("login"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/request")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"email\":")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "BAD_REQUEST");

    assert!(harness.repository.is_empty().await);
    assert_eq!(harness.email.get_message_count(), 0);
}

#[actix_web::test]
async fn test_delivery_failure_maps_to_bad_gateway() {
    let harness = Harness::new();
    harness.email.set_simulate_failure(true);
    let app = test::init_service(create_app(harness.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/request")
        .set_json(request_body("password_reset"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "DELIVERY_FAILED");
    assert!(harness.repository.is_empty().await);
}

#[actix_web::test]
async fn test_verify_wrong_then_right_code() {
    let harness = Harness::new();
    let app = test::init_service(create_app(harness.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/request")
        .set_json(request_body("password_reset"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    let code = harness.issued_code().await;

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/verify")
        .set_json(verify_body(wrong_code(&code)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "CODE_INVALID");
    assert_eq!(body["message"], "Invalid code. 4 attempts remaining");
    assert_eq!(body["details"]["remaining_attempts"], 4);

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/verify")
        .set_json(verify_body(&code))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["verified"], true);
    assert_eq!(body["message"], "Code verified successfully");

    // consumed
    let req = test::TestRequest::post()
        .uri("/api/v1/otp/verify")
        .set_json(verify_body(&code))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "CODE_INVALID_OR_EXPIRED");
}

#[actix_web::test]
async fn test_verify_exhausts_attempts() {
    let harness = Harness::new();
    let app = test::init_service(create_app(harness.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/request")
        .set_json(request_body("password_reset"))
        .to_request();
    test::call_service(&app, req).await;
    let code = harness.issued_code().await;
    let wrong = wrong_code(&code);

    for _ in 0..4 {
        let req = test::TestRequest::post()
            .uri("/api/v1/otp/verify")
            .set_json(verify_body(wrong))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/verify")
        .set_json(verify_body(wrong))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    // the right code no longer helps
    let req = test::TestRequest::post()
        .uri("/api/v1/otp/verify")
        .set_json(verify_body(&code))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "MAX_ATTEMPTS_EXCEEDED");
}

#[actix_web::test]
async fn test_verify_without_request() {
    let harness = Harness::new();
    let app = test::init_service(create_app(harness.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/verify")
        .set_json(verify_body("123456"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid or expired code");
}

#[actix_web::test]
async fn test_status_reports_active_code() {
    let harness = Harness::new();
    let app = test::init_service(create_app(harness.state.clone())).await;
    let uri = format!("/api/v1/otp/status?email={}&purpose=password_reset", EMAIL);

    let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["active"], false);
    assert_eq!(body["data"]["can_resend"], true);

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/request")
        .set_json(request_body("password_reset"))
        .to_request();
    test::call_service(&app, req).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["active"], true);
    assert_eq!(body["data"]["remaining_attempts"], 5);
    assert_eq!(body["data"]["can_resend"], false);
    assert!(body["data"]["resend_wait_seconds"].as_i64().unwrap() > 0);
}

#[actix_web::test]
async fn test_status_requires_query() {
    let harness = Harness::new();
    let app = test::init_service(create_app(harness.state.clone())).await;

    let req = test::TestRequest::get().uri("/api/v1/otp/status").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_unknown_route() {
    let harness = Harness::new();
    let app = test::init_service(create_app(harness.state.clone())).await;

    let req = test::TestRequest::get().uri("/api/v1/otp/unknown").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
