//! Periodic housekeeping.
//!
//! Purges expired or revoked sessions and stale OTP codes, and marks Pro
//! subscriptions whose period has ended as expired. Runs on a fixed
//! interval using `tokio::time::interval`.

use std::time::Duration;

use chrono::Utc;
use influx_db::repositories::{OtpRepo, ProSubscriptionRepo, SessionRepo};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// How often the cleanup job runs.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Run the cleanup loop until `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = CLEANUP_INTERVAL.as_secs(),
        "Cleanup job started"
    );

    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Cleanup job stopping");
                break;
            }
            _ = interval.tick() => {
                run_once(&pool).await;
            }
        }
    }
}

/// One cleanup pass. Each step logs its own failure and never aborts the rest.
pub async fn run_once(pool: &PgPool) {
    match SessionRepo::cleanup_expired(pool).await {
        Ok(0) => tracing::debug!("Cleanup: no sessions to purge"),
        Ok(deleted) => tracing::info!(deleted, "Cleanup: purged sessions"),
        Err(e) => tracing::error!(error = %e, "Cleanup: session purge failed"),
    }

    match OtpRepo::cleanup_expired(pool).await {
        Ok(0) => tracing::debug!("Cleanup: no OTP codes to purge"),
        Ok(deleted) => tracing::info!(deleted, "Cleanup: purged OTP codes"),
        Err(e) => tracing::error!(error = %e, "Cleanup: OTP purge failed"),
    }

    match ProSubscriptionRepo::expire_ended(pool, Utc::now()).await {
        Ok(0) => tracing::debug!("Cleanup: no Pro subscriptions ended"),
        Ok(expired) => tracing::info!(expired, "Cleanup: expired Pro subscriptions"),
        Err(e) => tracing::error!(error = %e, "Cleanup: Pro expiry failed"),
    }
}
