//! Service Container - centralized access to every application service.
//!
//! Handlers reach services through [`ServiceContainer`], so the HTTP layer
//! can be exercised against a `MockServiceContainer`.

use std::sync::Arc;

use super::{
    ApplicationManager, ApplicationService, AuthService, Authenticator, BookmarkManager,
    BookmarkService, CategoryManager, CategoryService, ListingManager, ListingService,
    UserManager, UserService,
};
use crate::config::Config;
use crate::infra::{Cache, Persistence};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn categories(&self) -> Arc<dyn CategoryService>;

    fn listings(&self) -> Arc<dyn ListingService>;

    fn applications(&self) -> Arc<dyn ApplicationService>;

    fn bookmarks(&self) -> Arc<dyn BookmarkService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    category_service: Arc<dyn CategoryService>,
    listing_service: Arc<dyn ListingService>,
    application_service: Arc<dyn ApplicationService>,
    bookmark_service: Arc<dyn BookmarkService>,
}

impl Services {
    /// Wire every service onto one SeaORM-backed unit of work.
    ///
    /// `cache` is `None` when Redis is not configured; the category catalog
    /// then reads straight from the database.
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        config: Config,
        cache: Option<Arc<Cache>>,
    ) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            category_service: Arc::new(CategoryManager::new(uow.clone(), cache)),
            listing_service: Arc::new(ListingManager::new(uow.clone())),
            application_service: Arc::new(ApplicationManager::new(uow.clone())),
            bookmark_service: Arc::new(BookmarkManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryService> {
        self.category_service.clone()
    }

    fn listings(&self) -> Arc<dyn ListingService> {
        self.listing_service.clone()
    }

    fn applications(&self) -> Arc<dyn ApplicationService> {
        self.application_service.clone()
    }

    fn bookmarks(&self) -> Arc<dyn BookmarkService> {
        self.bookmark_service.clone()
    }
}
