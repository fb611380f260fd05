//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain rules and repositories to fulfil the job
//! board's use cases. Every operation takes the caller's [`Identity`]
//! explicitly and runs the authorization policy before touching storage.
//!
//! [`Identity`]: crate::domain::Identity

mod application_service;
mod auth_service;
mod bookmark_service;
mod category_service;
pub mod container;
mod listing_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use application_service::{ApplicationManager, ApplicationService, Submission};
pub use auth_service::{AuthService, Authenticator, Claims, Registration, TokenResponse};
pub use bookmark_service::{BookmarkManager, BookmarkService};
pub use category_service::{CategoryManager, CategoryService};
pub use listing_service::{ListingManager, ListingService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
