//! HTTP handlers.

pub mod application_handler;
pub mod auth_handler;
pub mod bookmark_handler;
pub mod category_handler;
pub mod job_handler;
pub mod user_handler;

pub use application_handler::application_routes;
pub use auth_handler::auth_routes;
pub use bookmark_handler::bookmark_routes;
pub use category_handler::category_routes;
pub use job_handler::job_routes;
pub use user_handler::user_routes;

use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::errors::AppResult;
use crate::types::PaginationParams;

/// `?page=&size=` on list endpoints without other filters.
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-indexed page number (default 1)
    pub page: Option<u64>,
    /// Items per page (default 20, clamped to 100)
    pub size: Option<u64>,
}

impl PageQuery {
    pub fn params(&self) -> AppResult<PaginationParams> {
        PaginationParams::new(self.page, self.size)
    }
}
