use std::io::Write;
use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use log::info;

use authapi_api::app::create_app;
use authapi_api::routes::account::AppState;
use authapi_core::services::{
    AccountRecoveryConfig, AccountRecoveryService, SystemClock, TokenVerificationService,
    VerificationServiceConfig,
};
use authapi_infra::{DatabasePool, MockEmailService, MySqlUserRepository, MySqlVerificationTokenRepository};
use authapi_shared::config::{AppConfig, LogFormat, LoggingConfig};

fn init_logging(config: &LoggingConfig) {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(&config.filter());

    if config.format == LogFormat::Json {
        let timestamp = config.timestamp;
        builder.format(move |buf, record| {
            let mut entry = serde_json::json!({
                "level": record.level().to_string(),
                "target": record.target(),
                "message": record.args().to_string(),
            });
            if timestamp {
                entry["timestamp"] = serde_json::json!(chrono::Utc::now().to_rfc3339());
            }
            writeln!(buf, "{}", entry)
        });
    } else if !config.timestamp {
        builder.format_timestamp(None);
    }

    builder.init();
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_loaded = authapi_infra::load_dotenv();
    let config = AppConfig::from_env();

    init_logging(&config.logging);

    info!("Starting AuthApi server ({:?})", config.environment);
    if dotenv_loaded {
        info!("Loaded environment from .env");
    }

    let pool = DatabasePool::new(config.database.clone())
        .await
        .context("Failed to connect to database")?;
    pool.run_migrations()
        .await
        .context("Failed to run database migrations")?;

    let users = Arc::new(MySqlUserRepository::new(pool.get_pool().clone()));
    let tokens = Arc::new(MySqlVerificationTokenRepository::new(pool.get_pool().clone()));

    let verification = Arc::new(TokenVerificationService::new(
        tokens,
        Arc::new(SystemClock),
        VerificationServiceConfig::from(&config.verification),
    ));

    let recovery = Arc::new(AccountRecoveryService::new(
        users,
        verification,
        Arc::new(MockEmailService::new()),
        AccountRecoveryConfig::from(&config.verification),
    ));

    let app_state = web::Data::new(AppState::new(recovery, config.expose_recovery_links()));

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(app_state.clone()));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    pool.close().await;
    Ok(())
}
