//! Bearer-token authentication.
//!
//! [`auth_middleware`] runs on every API route. A request without an
//! `Authorization` header passes through anonymously; a present but invalid
//! or expired token is rejected with 401 even on public routes. Handlers
//! that need a caller take the [`CurrentUser`] extractor.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::api::AppState;
use crate::domain::Identity;
use crate::errors::AppError;

/// Authenticated caller, resolved from the bearer token.
#[derive(Clone, Copy, Debug)]
pub struct CurrentUser(pub Identity);

/// Verify the bearer token, if any, and attach the caller's [`Identity`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = request
        .headers()
        .typed_try_get::<Authorization<Bearer>>()
        .map_err(|_| AppError::Unauthorized)?;

    if let Some(Authorization(bearer)) = bearer {
        let identity = state.services.auth().authenticate(bearer.token()).await?;
        tracing::debug!(user_id = %identity.id, role = %identity.role, "Request authenticated");
        request.extensions_mut().insert(identity);
    }

    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .copied()
            .map(CurrentUser)
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use axum::http::Request as HttpRequest;
    use uuid::Uuid;

    #[tokio::test]
    async fn missing_identity_is_unauthorized() {
        let (mut parts, _) = HttpRequest::new(()).into_parts();
        let result = CurrentUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn identity_from_extensions_is_returned() {
        let identity = Identity::new(Uuid::new_v4(), UserRole::Employer);
        let (mut parts, _) = HttpRequest::new(()).into_parts();
        parts.extensions.insert(identity);

        let CurrentUser(found) = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(found, identity);
    }
}
