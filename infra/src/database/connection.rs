//! Connection pool management

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::time::Duration;

use ms_shared::config::DatabaseConfig;

use crate::InfrastructureError;

/// Create a MySQL connection pool from configuration.
///
/// The pool connects eagerly so a bad URL or unreachable server fails at
/// startup rather than on the first request.
pub async fn create_pool(config: &DatabaseConfig) -> Result<MySqlPool, InfrastructureError> {
    if !config.url.starts_with("mysql://") {
        return Err(InfrastructureError::Config(
            "DATABASE_URL must be a mysql:// URL".to_string(),
        ));
    }

    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout))
        .idle_timeout(Duration::from_secs(config.idle_timeout))
        .max_lifetime(Duration::from_secs(config.max_lifetime))
        .connect(&config.url)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        event = "db_pool_created",
        "MySQL connection pool created"
    );

    Ok(pool)
}

/// Apply the embedded migrations under `infra/migrations`
pub async fn run_migrations(pool: &MySqlPool) -> Result<(), InfrastructureError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!(event = "db_migrated", "Database migrations applied");
    Ok(())
}
