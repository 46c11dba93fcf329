//! Application factory
//!
//! Builds the Actix-web application around an already wired passcode
//! service, so the binary and the tests share the same routing.

use actix_web::{web, App, HttpResponse};
use std::collections::HashMap;
use tracing_actix_web::TracingLogger;

use og_core::repositories::OtpRepository;
use og_core::services::otp::EmailServiceTrait;
use og_shared::{error_codes, ErrorResponse, HealthResponse, HealthStatus};

use crate::handlers::error::{json_error_handler, query_error_handler};
use crate::routes::otp::{
    request_code::request_code, status::otp_status, verify_code::verify_code, AppState,
};

/// Maximum accepted JSON body, in bytes
const MAX_JSON_PAYLOAD: usize = 16 * 1024;

/// Create and configure the application with all dependencies
pub fn create_app<R, E>(
    app_state: web::Data<AppState<R, E>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    R: OtpRepository + 'static,
    E: EmailServiceTrait + 'static,
{
    App::new()
        .app_data(app_state)
        .app_data(
            web::JsonConfig::default()
                .limit(MAX_JSON_PAYLOAD)
                .error_handler(json_error_handler),
        )
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1").service(
                web::scope("/otp")
                    .route("/request", web::post().to(request_code::<R, E>))
                    .route("/verify", web::post().to(verify_code::<R, E>))
                    .route("/status", web::get().to(otp_status::<R, E>)),
            ),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: HealthStatus::Healthy,
        services: HashMap::new(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
