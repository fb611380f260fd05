//! Application route configuration.

use axum::{extract::State, http::StatusCode, middleware, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    application_routes, auth_routes, bookmark_routes, category_routes, job_routes, user_routes,
};
use super::middleware::{auth_middleware, rate_limit_auth_middleware, rate_limit_middleware};
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let general_limit = || middleware::from_fn_with_state(state.clone(), rate_limit_middleware);

    // Token verification runs on every API route; handlers decide whether
    // an identity is required.
    let api = Router::new()
        .nest(
            "/auth",
            auth_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit_auth_middleware,
            )),
        )
        .nest("/users", user_routes().route_layer(general_limit()))
        .nest("/categories", category_routes().route_layer(general_limit()))
        .nest("/jobs", job_routes().route_layer(general_limit()))
        .nest(
            "/applications",
            application_routes().route_layer(general_limit()),
        )
        .nest("/bookmarks", bookmark_routes().route_layer(general_limit()))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        // Health check endpoints (no rate limiting)
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api)
        // Global middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Job Board API"
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    services: ServiceHealth,
}

/// Individual service health status
#[derive(Serialize)]
struct ServiceHealth {
    database: ServiceStatus,
    cache: ServiceStatus,
}

/// Service status
#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServiceStatus {
    fn from_result<E: std::fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self {
                status: "healthy",
                error: None,
            },
            Err(e) => Self {
                status: "unhealthy",
                error: Some(e.to_string()),
            },
        }
    }

    fn is_up(&self) -> bool {
        self.status != "unhealthy"
    }
}

/// Health check endpoint with database and cache connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = ServiceStatus::from_result(state.database.ping().await);

    // Running without Redis is a supported mode, not a fault
    let cache = match &state.cache {
        Some(cache) => ServiceStatus::from_result(cache.ping().await),
        None => ServiceStatus {
            status: "disabled",
            error: None,
        },
    };

    let all_healthy = database.is_up() && cache.is_up();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" },
        services: ServiceHealth { database, cache },
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, CategoryResponse, Identity, User, UserRole};
    use crate::errors::{AppError, AppResult};
    use crate::infra::Database;
    use crate::services::{
        AuthService, CategoryService, Claims, MockServiceContainer, Registration, TokenResponse,
    };
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use sea_orm::DatabaseConnection;
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    /// Accepts exactly one token, as an employer.
    struct OneToken;

    #[async_trait]
    impl AuthService for OneToken {
        async fn register(&self, _: Registration) -> AppResult<User> {
            Err(AppError::Forbidden)
        }

        async fn create_admin(&self, _: String, _: String, _: String) -> AppResult<User> {
            Err(AppError::Forbidden)
        }

        async fn login(&self, _: String, _: String) -> AppResult<TokenResponse> {
            Err(AppError::InvalidCredentials)
        }

        fn verify_token(&self, _: &str) -> AppResult<Claims> {
            Err(AppError::Unauthorized)
        }

        async fn authenticate(&self, token: &str) -> AppResult<Identity> {
            match token {
                "employer-token" => Ok(Identity::new(Uuid::nil(), UserRole::Employer)),
                _ => Err(AppError::Unauthorized),
            }
        }
    }

    /// Fixed catalog; every write is refused.
    struct Catalog;

    #[async_trait]
    impl CategoryService for Catalog {
        async fn list(&self) -> AppResult<Vec<CategoryResponse>> {
            Ok(vec![CategoryResponse {
                id: Uuid::nil(),
                name: "Engineering".into(),
            }])
        }

        async fn create(&self, identity: &Identity, _: String) -> AppResult<Category> {
            crate::domain::policy::require_admin(identity)?;
            Err(AppError::internal("unreachable in tests"))
        }

        async fn rename(&self, _: &Identity, _: Uuid, _: String) -> AppResult<Category> {
            Err(AppError::NotFound)
        }

        async fn delete(&self, _: &Identity, _: Uuid) -> AppResult<()> {
            Err(AppError::NotFound)
        }

        async fn seed_defaults(&self) -> AppResult<usize> {
            Ok(0)
        }
    }

    fn router() -> Router {
        let mut services = MockServiceContainer::new();
        services
            .expect_auth()
            .returning(|| Arc::new(OneToken) as Arc<dyn AuthService>);
        services
            .expect_categories()
            .returning(|| Arc::new(Catalog) as Arc<dyn CategoryService>);
        let database = Arc::new(Database::from_connection(DatabaseConnection::Disconnected));
        create_router(AppState::new(Arc::new(services), database, None))
    }

    async fn send(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or_default())
    }

    #[tokio::test]
    async fn public_route_serves_anonymous_callers() {
        let request = Request::get("/categories").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"][0]["name"], "Engineering");
    }

    #[tokio::test]
    async fn bad_token_on_public_route_is_unauthorized() {
        let request = Request::get("/categories")
            .header(header::AUTHORIZATION, "Bearer forged")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_unauthorized() {
        let request = Request::get("/categories")
            .header(header::AUTHORIZATION, "Basic dXNlcjpwdw==")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn authenticated_employer_is_forbidden_from_admin_route() {
        let request = Request::post("/categories")
            .header(header::AUTHORIZATION, "Bearer employer-token")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"Sales"}"#))
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn invalid_body_uses_validation_envelope() {
        let request = Request::post("/categories")
            .header(header::AUTHORIZATION, "Bearer employer-token")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":""}"#))
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn root_banner_is_plain_text() {
        let response = router()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
