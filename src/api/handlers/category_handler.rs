//! Category catalog handlers.

use axum::{
    extract::State,
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{Path, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::CategoryResponse;
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

/// Create or rename a category
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    #[schema(example = "Engineering")]
    pub name: String,
}

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/:id", put(rename_category).delete(delete_category))
}

/// List all categories
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Categories",
    responses((status = 200, description = "Every live category", body = [CategoryResponse]))
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<CategoryResponse>>> {
    let categories = state.services.categories().list().await?;
    Ok(ApiResponse::success(categories))
}

/// Create a category (admin)
#[utoipa::path(
    post,
    path = "/categories",
    tag = "Categories",
    security(("bearer_auth" = [])),
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Name already in use")
    )
)]
pub async fn create_category(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CategoryRequest>,
) -> AppResult<Created<CategoryResponse>> {
    let category = state
        .services
        .categories()
        .create(&identity, payload.name)
        .await?;
    Ok(Created(CategoryResponse::from(category)))
}

/// Rename a category (admin)
#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category renamed", body = CategoryResponse),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Name already in use")
    )
)]
pub async fn rename_category(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CategoryRequest>,
) -> AppResult<ApiResponse<CategoryResponse>> {
    let category = state
        .services
        .categories()
        .rename(&identity, id, payload.name)
        .await?;
    Ok(ApiResponse::success(CategoryResponse::from(category)))
}

/// Soft delete a category (admin)
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    state.services.categories().delete(&identity, id).await?;
    Ok(ApiResponse::message("Category deleted"))
}
