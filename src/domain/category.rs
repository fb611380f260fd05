//! Job category catalog entry.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Lifecycle;
use crate::config::MAX_CATEGORY_NAME_LENGTH;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub lifecycle: Lifecycle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub id: Uuid,
    #[schema(example = "Engineering")]
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

/// Trim and bound a category name.
pub fn normalize_category_name(raw: &str) -> AppResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::validation("Category name is required"));
    }
    if name.chars().count() > MAX_CATEGORY_NAME_LENGTH {
        return Err(AppError::validation(format!(
            "Category name must be at most {} characters",
            MAX_CATEGORY_NAME_LENGTH
        )));
    }
    Ok(name.to_string())
}
