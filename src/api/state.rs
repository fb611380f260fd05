//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database};
use crate::services::{ServiceContainer, Services};

/// Shared state handed to every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    /// All application services
    pub services: Arc<dyn ServiceContainer>,
    /// Database handle, used by the health check
    pub database: Arc<Database>,
    /// Redis cache; `None` disables caching and rate limiting
    pub cache: Option<Arc<Cache>>,
}

impl AppState {
    /// Wire the SeaORM-backed services onto `database`.
    pub fn from_config(database: Arc<Database>, cache: Option<Arc<Cache>>, config: Config) -> Self {
        let services = Arc::new(Services::from_connection(
            database.get_connection(),
            config,
            cache.clone(),
        ));
        Self::new(services, database, cache)
    }

    /// Build state around an existing container (mock containers in tests).
    pub fn new(
        services: Arc<dyn ServiceContainer>,
        database: Arc<Database>,
        cache: Option<Arc<Cache>>,
    ) -> Self {
        Self {
            services,
            database,
            cache,
        }
    }
}
