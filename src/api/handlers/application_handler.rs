//! Application workflow handlers.

use axum::{
    extract::State,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::PageQuery;
use crate::api::extractors::{Path, ValidatedJson, ValidatedQuery};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{ApplicationResponse, ApplicationStatus, StatusExtra};
use crate::errors::AppResult;
use crate::services::Submission;
use crate::types::{ApiResponse, Created, Paginated, PaginationParams};

/// Apply to a job listing
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub job_id: Uuid,
    #[validate(length(max = 2048, message = "resumeUrl must be at most 2048 characters"))]
    #[schema(example = "https://cdn.example.com/resumes/jane.pdf")]
    pub resume_url: String,
    #[validate(length(max = 10000, message = "coverLetter must be at most 10000 characters"))]
    pub cover_letter: String,
    pub expected_salary: Option<i64>,
}

impl From<ApplyRequest> for Submission {
    fn from(req: ApplyRequest) -> Self {
        Self {
            job_id: req.job_id,
            resume_url: req.resume_url,
            cover_letter: req.cover_letter,
            expected_salary: req.expected_salary,
        }
    }
}

/// Move an application to a new status
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: ApplicationStatus,
    #[serde(flatten)]
    pub extra: StatusExtra,
}

#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct JobApplicationsQuery {
    /// Only applications in this status
    #[param(value_type = Option<String>)]
    pub status: Option<ApplicationStatus>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

pub fn application_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(apply))
        .route("/my-applications", get(list_my_applications))
        .route("/job/:job_id", get(list_job_applications))
        .route("/:id", get(get_application).delete(withdraw_application))
        .route("/:id/status", put(update_status))
}

/// Apply to a job (job seeker)
#[utoipa::path(
    post,
    path = "/applications",
    tag = "Applications",
    security(("bearer_auth" = [])),
    request_body = ApplyRequest,
    responses(
        (status = 201, description = "Application submitted", body = ApplicationResponse),
        (status = 400, description = "Listing closed or invalid payload"),
        (status = 404, description = "Listing not found"),
        (status = 409, description = "Already applied")
    )
)]
pub async fn apply(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ApplyRequest>,
) -> AppResult<Created<ApplicationResponse>> {
    let application = state
        .services
        .applications()
        .apply(&identity, payload.into())
        .await?;
    Ok(Created(application))
}

/// The caller's applications (job seeker)
#[utoipa::path(
    get,
    path = "/applications/my-applications",
    tag = "Applications",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Page of own applications"),
        (status = 403, description = "Job seekers only")
    )
)]
pub async fn list_my_applications(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> AppResult<ApiResponse<Paginated<ApplicationResponse>>> {
    let page = state
        .services
        .applications()
        .list_mine(&identity, query.params()?)
        .await?;
    Ok(ApiResponse::success(page))
}

/// Applications to one job (owning employer or admin)
#[utoipa::path(
    get,
    path = "/applications/job/{job_id}",
    tag = "Applications",
    security(("bearer_auth" = [])),
    params(("job_id" = Uuid, Path, description = "Listing ID"), JobApplicationsQuery),
    responses(
        (status = 200, description = "Page of applications"),
        (status = 403, description = "Not the listing owner"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn list_job_applications(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    ValidatedQuery(query): ValidatedQuery<JobApplicationsQuery>,
) -> AppResult<ApiResponse<Paginated<ApplicationResponse>>> {
    let params = PaginationParams::new(query.page, query.size)?;
    let page = state
        .services
        .applications()
        .list_for_job(&identity, job_id, query.status, params)
        .await?;
    Ok(ApiResponse::success(page))
}

/// Get one application
#[utoipa::path(
    get,
    path = "/applications/{id}",
    tag = "Applications",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Application ID")),
    responses(
        (status = 200, description = "The application", body = ApplicationResponse),
        (status = 403, description = "Not a party to this application"),
        (status = 404, description = "Application not found")
    )
)]
pub async fn get_application(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<ApplicationResponse>> {
    let application = state.services.applications().get(&identity, id).await?;
    Ok(ApiResponse::success(application))
}

/// Change an application's status (owning employer or admin)
#[utoipa::path(
    put,
    path = "/applications/{id}/status",
    tag = "Applications",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Application ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApplicationResponse),
        (status = 403, description = "Not the listing owner"),
        (status = 404, description = "Application not found"),
        (status = 409, description = "Transition not allowed")
    )
)]
pub async fn update_status(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateStatusRequest>,
) -> AppResult<ApiResponse<ApplicationResponse>> {
    let application = state
        .services
        .applications()
        .update_status(&identity, id, payload.status, payload.extra)
        .await?;
    Ok(ApiResponse::success(application))
}

/// Withdraw an application (applicant or admin)
#[utoipa::path(
    delete,
    path = "/applications/{id}",
    tag = "Applications",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application withdrawn"),
        (status = 403, description = "Not the applicant"),
        (status = 404, description = "Application not found")
    )
)]
pub async fn withdraw_application(
    CurrentUser(identity): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    state.services.applications().withdraw(&identity, id).await?;
    Ok(ApiResponse::message("Application withdrawn"))
}
