//! Bookmark handlers.

use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{Path, ValidatedJson, ValidatedQuery};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{BookmarkChanges, BookmarkInput, BookmarkResponse, BookmarkStatus};
use crate::errors::{AppError, AppResult};
use crate::types::{ApiResponse, Created, Paginated, PaginationParams};

#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookmarkQuery {
    /// Only bookmarks in this status
    #[param(value_type = Option<String>)]
    pub status: Option<BookmarkStatus>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkState {
    pub is_bookmarked: bool,
}

pub fn bookmark_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_bookmarks))
        .route(
            "/:job_id",
            post(add_bookmark)
                .put(update_bookmark)
                .delete(remove_bookmark),
        )
        .route("/:job_id/status", get(bookmark_status))
}

/// An absent or empty body means "no notes, no reminder".
fn parse_input(body: &[u8]) -> AppResult<BookmarkInput> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(BookmarkInput::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::validation(format!("Invalid JSON body: {}", e)))
}

/// Bookmark a listing (job seeker)
#[utoipa::path(
    post,
    path = "/bookmarks/{job_id}",
    tag = "Bookmarks",
    security(("bearer_auth" = [])),
    params(("job_id" = Uuid, Path, description = "Listing ID")),
    request_body(content = BookmarkInput, description = "Optional notes and reminder"),
    responses(
        (status = 201, description = "Bookmark saved", body = BookmarkResponse),
        (status = 403, description = "Job seekers only"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn add_bookmark(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    body: Bytes,
) -> AppResult<Created<BookmarkResponse>> {
    let input = parse_input(&body)?;
    let bookmark = state
        .services
        .bookmarks()
        .add(&identity, job_id, input)
        .await?;
    Ok(Created(bookmark))
}

/// Update notes, status or reminder of a bookmark (job seeker)
#[utoipa::path(
    put,
    path = "/bookmarks/{job_id}",
    tag = "Bookmarks",
    security(("bearer_auth" = [])),
    params(("job_id" = Uuid, Path, description = "Listing ID")),
    request_body = BookmarkChanges,
    responses(
        (status = 200, description = "Bookmark updated", body = BookmarkResponse),
        (status = 404, description = "No bookmark for this listing")
    )
)]
pub async fn update_bookmark(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<BookmarkChanges>,
) -> AppResult<ApiResponse<BookmarkResponse>> {
    let bookmark = state
        .services
        .bookmarks()
        .update(&identity, job_id, payload)
        .await?;
    Ok(ApiResponse::success(bookmark))
}

/// Remove a bookmark (job seeker); succeeds when there is none
#[utoipa::path(
    delete,
    path = "/bookmarks/{job_id}",
    tag = "Bookmarks",
    security(("bearer_auth" = [])),
    params(("job_id" = Uuid, Path, description = "Listing ID")),
    responses((status = 200, description = "Bookmark removed"))
)]
pub async fn remove_bookmark(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    state.services.bookmarks().remove(&identity, job_id).await?;
    Ok(ApiResponse::message("Bookmark removed"))
}

/// The caller's bookmarks (job seeker)
#[utoipa::path(
    get,
    path = "/bookmarks",
    tag = "Bookmarks",
    security(("bearer_auth" = [])),
    params(BookmarkQuery),
    responses(
        (status = 200, description = "Page of bookmarks"),
        (status = 403, description = "Job seekers only")
    )
)]
pub async fn list_bookmarks(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<BookmarkQuery>,
) -> AppResult<ApiResponse<Paginated<BookmarkResponse>>> {
    let params = PaginationParams::new(query.page, query.size)?;
    let page = state
        .services
        .bookmarks()
        .list(&identity, query.status, params)
        .await?;
    Ok(ApiResponse::success(page))
}

/// Whether the caller has bookmarked a listing
#[utoipa::path(
    get,
    path = "/bookmarks/{job_id}/status",
    tag = "Bookmarks",
    security(("bearer_auth" = [])),
    params(("job_id" = Uuid, Path, description = "Listing ID")),
    responses((status = 200, description = "Bookmark state", body = BookmarkState))
)]
pub async fn bookmark_status(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> AppResult<ApiResponse<BookmarkState>> {
    let is_bookmarked = state
        .services
        .bookmarks()
        .is_bookmarked(&identity, job_id)
        .await?;
    Ok(ApiResponse::success(BookmarkState { is_bookmarked }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_means_defaults() {
        let input = parse_input(b"").unwrap();
        assert!(input.notes.is_none());
        assert!(input.reminder_date.is_none());
        assert!(parse_input(b"  \n").is_ok());
    }

    #[test]
    fn body_fields_are_camel_case() {
        let input = parse_input(br#"{"notes":"call back","reminderDate":"2030-02-01"}"#).unwrap();
        assert_eq!(input.notes.as_deref(), Some("call back"));
        assert_eq!(
            input.reminder_date,
            chrono::NaiveDate::from_ymd_opt(2030, 2, 1)
        );
    }

    #[test]
    fn malformed_body_is_a_validation_error() {
        assert!(matches!(
            parse_input(b"{notes"),
            Err(AppError::Validation(_))
        ));
    }
}
