use actix_web::{middleware::Compress, web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use ms_api::middleware::{create_cors, RateLimiter, SecurityMiddleware};
use ms_api::{configure, json_config, not_found, telemetry, AppState};
use ms_core::domain::entities::subject::UserType;
use ms_core::repositories::{OtpRepository, SubjectDirectory};
use ms_core::services::{
    BcryptCredentialService, JwtResetTokenSigner, NotificationDispatcher, OtpCleanupConfig,
    OtpCleanupService, OtpService, OtpServiceConfig, PasswordResetConfig, PasswordResetService,
};
use ms_infra::{
    create_email_service, create_pool, create_sms_service, run_migrations, ChannelDispatcher,
    MySqlOtpRepository, MySqlSubjectRepository,
};
use ms_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env();
    telemetry::init_tracing(&config.logging);

    tracing::info!(
        environment = %config.environment,
        "Starting Moreshop admin API"
    );

    if config.jwt.is_using_default_secret() {
        if config.is_production() {
            anyhow::bail!("JWT_SECRET must be set in production");
        }
        tracing::warn!("Using the default JWT secret; set JWT_SECRET outside development");
    }

    // Persistence
    let pool = create_pool(&config.database)
        .await
        .context("failed to connect to MySQL")?;
    run_migrations(&pool)
        .await
        .context("failed to apply migrations")?;

    let subjects = SubjectDirectory::new(
        Arc::new(MySqlSubjectRepository::new(pool.clone(), UserType::Admin)),
        Arc::new(MySqlSubjectRepository::new(pool.clone(), UserType::Tenant)),
        Arc::new(MySqlSubjectRepository::new(pool.clone(), UserType::User)),
    );
    let otps: Arc<dyn OtpRepository> = Arc::new(MySqlOtpRepository::new(pool));

    // Delivery
    let dispatcher: Arc<dyn NotificationDispatcher> = Arc::new(ChannelDispatcher::new(
        create_sms_service(&config.notification.sms).context("invalid SMS configuration")?,
        create_email_service(&config.notification.email)
            .context("invalid e-mail configuration")?,
    ));

    // Services
    let credentials = Arc::new(BcryptCredentialService::new(config.otp.hash_cost));
    let otp_service = Arc::new(OtpService::new(
        subjects.clone(),
        otps.clone(),
        credentials.clone(),
        dispatcher.clone(),
        OtpServiceConfig::from_app_config(&config.otp, &config.notification),
    ));
    let password_reset_service = Arc::new(PasswordResetService::new(
        subjects,
        credentials,
        dispatcher,
        Arc::new(JwtResetTokenSigner::from_config(&config.jwt)),
        PasswordResetConfig::from_app_config(&config.jwt, &config.notification),
    ));

    let cleanup = Arc::new(OtpCleanupService::new(
        otps,
        OtpCleanupConfig::from(&config.otp),
    ));
    let cleanup_handle = cleanup.start_background_task();

    let state = web::Data::new(AppState::new(otp_service, password_reset_service));
    let limiter = RateLimiter::new(&config.rate_limit)
        .with_trusted_proxies(config.server.trusted_proxies.clone());
    let security = SecurityMiddleware::new(
        config.environment,
        config.server.trusted_proxies.clone(),
    );
    let cors_config = config.cors.clone();
    let max_payload_size = config.server.max_payload_size;

    let bind_address = config.server.bind_address();
    tracing::info!(address = %bind_address, "Server will bind");

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(json_config(max_payload_size))
            .wrap(Compress::default())
            .wrap(create_cors(&cors_config))
            .wrap(security.clone())
            .wrap(TracingLogger::default())
            .configure(configure(limiter.clone()))
            .default_service(web::to(not_found))
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    if let Some(handle) = cleanup_handle {
        handle.abort();
    }
    tracing::info!("Server stopped");
    Ok(())
}
