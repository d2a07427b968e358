use std::sync::Arc;

use influx_cloud::ObjectStorage;
use influx_events::Notifier;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: influx_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Upload backend (S3 in production, in-memory in tests).
    pub storage: Arc<dyn ObjectStorage>,
    /// Outbound notification channels.
    pub notifier: Notifier,
}
