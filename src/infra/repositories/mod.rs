//! Repository layer - Data access abstraction
//!
//! One repository trait per entity, each with a SeaORM-backed `*Store`.
//! Query methods exclude soft-deleted rows unless their name says otherwise.

mod application_repository;
mod base;
mod bookmark_repository;
mod category_repository;
pub(crate) mod entities;
mod listing_repository;
mod user_repository;

pub use application_repository::{ApplicationRepository, ApplicationStore};
pub use bookmark_repository::{BookmarkRepository, BookmarkStore};
pub use category_repository::{CategoryRepository, CategoryStore};
pub use listing_repository::{ListingRepository, ListingStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use application_repository::MockApplicationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use bookmark_repository::MockBookmarkRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use category_repository::MockCategoryRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use listing_repository::MockListingRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
