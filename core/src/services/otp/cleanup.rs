//! Periodic removal of expired OTP records

use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use ms_shared::config::OtpConfig;

use crate::errors::DomainError;
use crate::repositories::OtpRepository;

/// Configuration for the OTP cleanup service
#[derive(Debug, Clone)]
pub struct OtpCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for OtpCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 300,
            enabled: true,
        }
    }
}

impl From<&OtpConfig> for OtpCleanupConfig {
    fn from(config: &OtpConfig) -> Self {
        Self {
            interval_seconds: config.cleanup_interval_secs,
            enabled: true,
        }
    }
}

/// Deletes expired codes so the store does not grow with abandoned challenges
pub struct OtpCleanupService {
    repository: Arc<dyn OtpRepository>,
    config: OtpCleanupConfig,
}

impl OtpCleanupService {
    pub fn new(repository: Arc<dyn OtpRepository>, config: OtpCleanupConfig) -> Self {
        Self { repository, config }
    }

    /// Run a single cleanup cycle, returning the number of records removed
    pub async fn run_cleanup(&self) -> Result<u64, DomainError> {
        if !self.config.enabled {
            return Ok(0);
        }

        let removed = self.repository.purge_expired(Utc::now()).await?;
        if removed > 0 {
            info!(removed, event = "otp_cleanup", "Removed expired OTP records");
        }
        Ok(removed)
    }

    /// Spawn a tokio task that runs cleanup at regular intervals
    ///
    /// Returns `None` when cleanup is disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("OTP cleanup service is disabled");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds.max(1));

        Some(tokio::spawn(async move {
            info!(
                "OTP cleanup service started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                if let Err(e) = self.run_cleanup().await {
                    error!("OTP cleanup cycle failed: {}", e);
                }
            }
        }))
    }
}
