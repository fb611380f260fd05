//! OpenAPI documentation configuration.
//!
//! Served through Swagger UI at `/swagger-ui`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    application_handler, auth_handler, bookmark_handler, category_handler, job_handler,
    user_handler,
};
use crate::domain::{
    ApplicationResponse, ApplicationStatus, BookmarkChanges, BookmarkInput, BookmarkResponse,
    BookmarkStatus, CategoryResponse, JobType, ListingChanges, ListingInput, ListingResponse,
    ListingSort, ListingSummary, StatusExtra, UserResponse, UserRole, UserSummary,
};
use crate::services::TokenResponse;

/// OpenAPI documentation for the job board
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Job Board API",
        version = "0.1.0",
        description = "Job listings, applications and bookmarks for job seekers and employers",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        user_handler::get_current_user,
        user_handler::list_users,
        user_handler::delete_user,
        category_handler::list_categories,
        category_handler::create_category,
        category_handler::rename_category,
        category_handler::delete_category,
        job_handler::list_jobs,
        job_handler::search_jobs,
        job_handler::list_my_jobs,
        job_handler::get_job,
        job_handler::audit_job,
        job_handler::create_job,
        job_handler::update_job,
        job_handler::delete_job,
        application_handler::apply,
        application_handler::list_my_applications,
        application_handler::list_job_applications,
        application_handler::get_application,
        application_handler::update_status,
        application_handler::withdraw_application,
        bookmark_handler::add_bookmark,
        bookmark_handler::update_bookmark,
        bookmark_handler::remove_bookmark,
        bookmark_handler::list_bookmarks,
        bookmark_handler::bookmark_status,
    ),
    components(
        schemas(
            UserRole,
            UserResponse,
            UserSummary,
            CategoryResponse,
            JobType,
            ListingSort,
            ListingInput,
            ListingChanges,
            ListingResponse,
            ListingSummary,
            ApplicationStatus,
            ApplicationResponse,
            StatusExtra,
            BookmarkStatus,
            BookmarkInput,
            BookmarkChanges,
            BookmarkResponse,
            TokenResponse,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            category_handler::CategoryRequest,
            application_handler::ApplyRequest,
            application_handler::UpdateStatusRequest,
            bookmark_handler::BookmarkState,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and login"),
        (name = "Users", description = "Profiles and user administration"),
        (name = "Categories", description = "Job category catalog"),
        (name = "Jobs", description = "Job listings"),
        (name = "Applications", description = "Applying and reviewing applicants"),
        (name = "Bookmarks", description = "Saved listings")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route_group() {
        let doc = ApiDoc::openapi();
        for path in [
            "/auth/login",
            "/users/me",
            "/categories",
            "/jobs/{id}",
            "/applications/{id}/status",
            "/bookmarks/{job_id}/status",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
