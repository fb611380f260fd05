//! Shared types: pagination and response envelopes.

mod pagination;
mod response;

pub use pagination::{Paginated, PaginationParams};
pub use response::{ApiResponse, Created};
