//! Unit of Work: the single access point to every repository.
//!
//! Services depend on [`UnitOfWork`] rather than on concrete stores; unit
//! tests plug mockall repositories into `MockPersistence`.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{
    ApplicationRepository, ApplicationStore, BookmarkRepository, BookmarkStore,
    CategoryRepository, CategoryStore, ListingRepository, ListingStore, UserRepository, UserStore,
};

/// Repository hub handed to every service.
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn categories(&self) -> Arc<dyn CategoryRepository>;

    fn listings(&self) -> Arc<dyn ListingRepository>;

    fn applications(&self) -> Arc<dyn ApplicationRepository>;

    fn bookmarks(&self) -> Arc<dyn BookmarkRepository>;
}

/// SeaORM-backed implementation of UnitOfWork
pub struct Persistence {
    users: Arc<UserStore>,
    categories: Arc<CategoryStore>,
    listings: Arc<ListingStore>,
    applications: Arc<ApplicationStore>,
    bookmarks: Arc<BookmarkStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            categories: Arc::new(CategoryStore::new(db.clone())),
            listings: Arc::new(ListingStore::new(db.clone())),
            applications: Arc::new(ApplicationStore::new(db.clone())),
            bookmarks: Arc::new(BookmarkStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.categories.clone()
    }

    fn listings(&self) -> Arc<dyn ListingRepository> {
        self.listings.clone()
    }

    fn applications(&self) -> Arc<dyn ApplicationRepository> {
        self.applications.clone()
    }

    fn bookmarks(&self) -> Arc<dyn BookmarkRepository> {
        self.bookmarks.clone()
    }
}

/// Hand-assembled hub of arbitrary repositories, used with mocks in tests.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockPersistence {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub listings: Arc<dyn ListingRepository>,
    pub applications: Arc<dyn ApplicationRepository>,
    pub bookmarks: Arc<dyn BookmarkRepository>,
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for MockPersistence {
    /// Every repository is a mock with no expectations; any call panics.
    fn default() -> Self {
        use super::repositories::{
            MockApplicationRepository, MockBookmarkRepository, MockCategoryRepository,
            MockListingRepository, MockUserRepository,
        };
        Self {
            users: Arc::new(MockUserRepository::new()),
            categories: Arc::new(MockCategoryRepository::new()),
            listings: Arc::new(MockListingRepository::new()),
            applications: Arc::new(MockApplicationRepository::new()),
            bookmarks: Arc::new(MockBookmarkRepository::new()),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl UnitOfWork for MockPersistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.categories.clone()
    }

    fn listings(&self) -> Arc<dyn ListingRepository> {
        self.listings.clone()
    }

    fn applications(&self) -> Arc<dyn ApplicationRepository> {
        self.applications.clone()
    }

    fn bookmarks(&self) -> Arc<dyn BookmarkRepository> {
        self.bookmarks.clone()
    }
}
