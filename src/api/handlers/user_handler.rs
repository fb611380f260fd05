//! User handlers.

use axum::{
    extract::State,
    routing::{delete, get},
    Router,
};
use uuid::Uuid;

use super::PageQuery;
use crate::api::extractors::{Path, ValidatedQuery};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::errors::AppResult;
use crate::types::{ApiResponse, Paginated};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/me", get(get_current_user))
        .route("/:id", delete(delete_user))
}

/// Get the caller's own profile
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_current_user(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.services.users().me(&identity).await?;
    Ok(ApiResponse::success(UserResponse::from(user)))
}

/// List users (admin)
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Page of users"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_users(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> AppResult<ApiResponse<Paginated<UserResponse>>> {
    let page = state
        .services
        .users()
        .list_users(&identity, query.params()?)
        .await?;
    Ok(ApiResponse::success(page.map(UserResponse::from)))
}

/// Soft delete a user (admin)
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 400, description = "Cannot delete yourself"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    state.services.users().delete_user(&identity, id).await?;
    Ok(ApiResponse::message("User deleted"))
}
