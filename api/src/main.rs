use actix_web::{web, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;

use og_api::config::{Config, StorageBackend};
use og_api::{create_app, telemetry, AppState};
use og_core::repositories::{InMemoryOtpRepository, OtpRepository};
use og_core::services::otp::{OtpService, OtpServiceConfig};
use og_infra::database::{DatabasePool, MySqlOtpRepository};
use og_infra::email::EmailServiceAdapter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::load().context("failed to load configuration")?;
    telemetry::init_tracing(&config.app.logging);
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;

    tracing::info!(
        environment = %config.app.environment,
        storage = ?config.storage,
        email_provider = ?config.app.email.provider,
        "Starting OtpGate API server"
    );

    match config.storage {
        StorageBackend::Memory => {
            if config.is_production() {
                tracing::warn!("In-memory storage in production; passcodes are lost on restart");
            }
            serve(&config, Arc::new(InMemoryOtpRepository::new())).await
        }
        StorageBackend::Mysql => {
            let pool = DatabasePool::new(config.app.database.clone())
                .await
                .context("failed to connect to MySQL")?;
            tracing::info!(stats = %pool.get_statistics(), "Database pool ready");

            let repository = Arc::new(MySqlOtpRepository::new(pool.get_pool().clone()));
            let result = serve(&config, repository).await;
            pool.close().await;
            result
        }
    }
}

async fn serve<R>(config: &Config, repository: Arc<R>) -> anyhow::Result<()>
where
    R: OtpRepository + 'static,
{
    let email = Arc::new(EmailServiceAdapter::from_config(&config.app.email));
    tracing::info!(provider = email.provider_name(), "Email service ready");

    let service_config =
        OtpServiceConfig::from_config(&config.app.otp, config.app.email.sender_name.clone());
    let service = Arc::new(OtpService::new(repository, email, service_config));

    // Scheduled sweep of expired and long-verified records
    service.reaper().start_background_task();

    let state = web::Data::new(AppState::new(service));
    let server = &config.app.server;
    let bind_address = server.bind_address();
    tracing::info!(address = %bind_address, "Server will bind");

    let mut http = HttpServer::new(move || create_app(state.clone()))
        .keep_alive(Duration::from_secs(server.keep_alive));
    if server.workers > 0 {
        http = http.workers(server.workers);
    }

    http.bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await
        .context("server error")
}
