//! Domain layer - Core business entities and rules
//!
//! Entities, value objects, input parsing, the application state machine
//! and the authorization policy. Nothing here touches storage or HTTP.

pub mod application;
pub mod bookmark;
pub mod category;
pub mod lifecycle;
pub mod listing;
pub mod password;
pub mod policy;
pub mod user;

pub use application::{
    Application, ApplicationResponse, ApplicationStatus, NewApplication, StatusChange,
    StatusExtra, TransitionPlan,
};
pub use bookmark::{Bookmark, BookmarkChanges, BookmarkInput, BookmarkResponse, BookmarkStatus};
pub use category::{Category, CategoryResponse};
pub use lifecycle::Lifecycle;
pub use listing::{
    JobListing, JobType, ListingChanges, ListingFilter, ListingInput, ListingPatch,
    ListingResponse, ListingSort, ListingSummary, NewListing, Visibility,
};
pub use password::Password;
pub use user::{Identity, NewUser, User, UserResponse, UserRole, UserSummary};
