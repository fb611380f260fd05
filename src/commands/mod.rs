//! Commands module - CLI command implementations.

pub mod admin;
pub mod categories;
pub mod migrate;
pub mod serve;

use std::sync::Arc;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Cache, Database};
use crate::services::Services;

/// Connect to Redis when configured.
///
/// A configured but unreachable Redis is logged and treated as absent so the
/// API still starts; caching and rate limiting stay off for this process.
pub async fn connect_cache(config: &Config) -> Option<Arc<Cache>> {
    let url = config.redis_url.as_deref()?;
    match Cache::try_connect(url).await {
        Ok(cache) => Some(Arc::new(cache)),
        Err(e) => {
            tracing::error!(error = %e, "Redis unavailable, running without cache");
            None
        }
    }
}

/// Services over a migrated database, for one-shot administrative commands.
async fn offline_services(config: Config) -> AppResult<Services> {
    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    let cache = connect_cache(&config).await;
    Ok(Services::from_connection(db.get_connection(), config, cache))
}
