//! Job listing handlers.

use axum::{
    extract::State,
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{Path, ValidatedJson, ValidatedQuery};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{
    listing::today, JobType, ListingChanges, ListingFilter, ListingInput, ListingResponse,
    ListingSort,
};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, Paginated, PaginationParams};

/// Filters for the public listing feed.
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct JobQuery {
    pub page: Option<u64>,
    pub size: Option<u64>,
    /// Category id
    pub category: Option<Uuid>,
    /// full-time, part-time, contract, internship or remote
    pub job_type: Option<String>,
    /// Case-insensitive substring of the location
    pub location: Option<String>,
    #[validate(range(min = 0, message = "salaryMin cannot be negative"))]
    pub salary_min: Option<i64>,
    #[validate(range(min = 0, message = "salaryMax cannot be negative"))]
    pub salary_max: Option<i64>,
    /// Free-text search over title, description and location
    pub q: Option<String>,
    /// newest (default), deadline or premium
    #[param(value_type = Option<String>)]
    pub sort: Option<ListingSort>,
}

impl JobQuery {
    fn into_parts(self) -> AppResult<(ListingFilter, PaginationParams)> {
        let params = PaginationParams::new(self.page, self.size)?;
        let job_type = self
            .job_type
            .filter(|t| !t.trim().is_empty())
            .map(|t| t.parse::<JobType>())
            .transpose()?;
        let filter = ListingFilter {
            category_id: self.category,
            job_type,
            location: self.location,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            search: self.q,
            sort: self.sort.unwrap_or_default(),
            ..ListingFilter::open(today())
        };
        Ok((filter, params))
    }
}

#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

/// Management list filters.
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MineQuery {
    /// Admins only: whose listings to show
    pub employer_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

pub fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_jobs).post(create_job))
        .route("/search", get(search_jobs))
        .route("/mine", get(list_my_jobs))
        .route("/:id", get(get_job).put(update_job).delete(delete_job))
        .route("/:id/audit", get(audit_job))
}

/// List open job listings
#[utoipa::path(
    get,
    path = "/jobs",
    tag = "Jobs",
    params(JobQuery),
    responses(
        (status = 200, description = "Page of open listings"),
        (status = 400, description = "Invalid filter")
    )
)]
pub async fn list_jobs(
    caller: Option<CurrentUser>,
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<JobQuery>,
) -> AppResult<ApiResponse<Paginated<ListingResponse>>> {
    let (filter, params) = query.into_parts()?;
    let viewer = caller.map(|CurrentUser(identity)| identity);
    let page = state
        .services
        .listings()
        .list(viewer.as_ref(), filter, params)
        .await?;
    Ok(ApiResponse::success(page))
}

/// Search open job listings
#[utoipa::path(
    get,
    path = "/jobs/search",
    tag = "Jobs",
    params(SearchQuery),
    responses((status = 200, description = "Page of matching listings"))
)]
pub async fn search_jobs(
    caller: Option<CurrentUser>,
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<SearchQuery>,
) -> AppResult<ApiResponse<Paginated<ListingResponse>>> {
    let params = PaginationParams::new(query.page, query.size)?;
    let viewer = caller.map(|CurrentUser(identity)| identity);
    let page = state
        .services
        .listings()
        .search(viewer.as_ref(), query.q, params)
        .await?;
    Ok(ApiResponse::success(page))
}

/// List listings the caller manages
#[utoipa::path(
    get,
    path = "/jobs/mine",
    tag = "Jobs",
    security(("bearer_auth" = [])),
    params(MineQuery),
    responses(
        (status = 200, description = "Page of managed listings"),
        (status = 403, description = "Employers and admins only")
    )
)]
pub async fn list_my_jobs(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<MineQuery>,
) -> AppResult<ApiResponse<Paginated<ListingResponse>>> {
    let params = PaginationParams::new(query.page, query.size)?;
    let page = state
        .services
        .listings()
        .list_mine(&identity, query.employer_id, query.is_active, params)
        .await?;
    Ok(ApiResponse::success(page))
}

/// Get a job listing
#[utoipa::path(
    get,
    path = "/jobs/{id}",
    tag = "Jobs",
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "The listing", body = ListingResponse),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn get_job(
    caller: Option<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<ListingResponse>> {
    let viewer = caller.map(|CurrentUser(identity)| identity);
    let listing = state.services.listings().get(viewer.as_ref(), id).await?;
    Ok(ApiResponse::success(listing))
}

/// Get a listing including soft-deleted ones (admin)
#[utoipa::path(
    get,
    path = "/jobs/{id}/audit",
    tag = "Jobs",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "The listing", body = ListingResponse),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn audit_job(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<ListingResponse>> {
    let listing = state.services.listings().audit(&identity, id).await?;
    Ok(ApiResponse::success(listing))
}

/// Post a job listing (employer)
#[utoipa::path(
    post,
    path = "/jobs",
    tag = "Jobs",
    security(("bearer_auth" = [])),
    request_body = ListingInput,
    responses(
        (status = 201, description = "Listing created", body = ListingResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Employers only")
    )
)]
pub async fn create_job(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ListingInput>,
) -> AppResult<Created<ListingResponse>> {
    let listing = state.services.listings().create(&identity, payload).await?;
    Ok(Created(ListingResponse::from(listing)))
}

/// Update a job listing (owner or admin)
#[utoipa::path(
    put,
    path = "/jobs/{id}",
    tag = "Jobs",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Listing ID")),
    request_body = ListingChanges,
    responses(
        (status = 200, description = "Listing updated", body = ListingResponse),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn update_job(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ListingChanges>,
) -> AppResult<ApiResponse<ListingResponse>> {
    let listing = state
        .services
        .listings()
        .update(&identity, id, payload)
        .await?;
    Ok(ApiResponse::success(ListingResponse::from(listing)))
}

/// Soft delete a job listing (owner or admin)
#[utoipa::path(
    delete,
    path = "/jobs/{id}",
    tag = "Jobs",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn delete_job(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    state.services.listings().delete(&identity, id).await?;
    Ok(ApiResponse::message("Job listing deleted"))
}
