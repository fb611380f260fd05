//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::errors::{AppError, AppResult};

/// Pagination parameters (1-indexed page, page size).
///
/// `page` and `size` below 1 are rejected; `size` above
/// [`MAX_PAGE_SIZE`] is clamped. A page whose row offset does not fit
/// in an `i64` is rejected as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_size")]
    pub size: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    /// Build validated parameters, falling back to defaults for missing values.
    pub fn new(page: Option<u64>, size: Option<u64>) -> AppResult<Self> {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE_NUMBER),
            size: size.unwrap_or(DEFAULT_PAGE_SIZE),
        }
        .validated()
    }

    /// Reject zero values and unreachable pages, and clamp the page size.
    pub fn validated(self) -> AppResult<Self> {
        if self.page < 1 {
            return Err(AppError::validation("page must be at least 1"));
        }
        if self.size < 1 {
            return Err(AppError::validation("size must be at least 1"));
        }
        let params = Self {
            page: self.page,
            size: self.size.min(MAX_PAGE_SIZE),
        };
        params.offset()?;
        Ok(params)
    }

    /// Row offset of the first item on this page
    pub fn offset(&self) -> AppResult<u64> {
        self.page
            .checked_sub(1)
            .and_then(|skipped| skipped.checked_mul(self.limit()))
            .filter(|offset| *offset <= i64::MAX as u64)
            .ok_or_else(|| AppError::validation("page is out of range"))
    }

    /// Get limit capped at maximum
    pub fn limit(&self) -> u64 {
        self.size.min(MAX_PAGE_SIZE)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper: `{data, total, page, size}`
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    /// Count of all matching rows, independent of page and size
    pub total: u64,
    pub page: u64,
    pub size: u64,
}

impl<T> Paginated<T> {
    /// Create new paginated response
    pub fn new(data: Vec<T>, params: PaginationParams, total: u64) -> Self {
        Self {
            data,
            total,
            page: params.page,
            size: params.limit(),
        }
    }

    /// Total number of pages for the current page size
    pub fn total_pages(&self) -> u64 {
        if self.size > 0 {
            self.total.div_ceil(self.size)
        } else {
            0
        }
    }

    /// Transform every item while keeping the page metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            size: self.size,
        }
    }
}
