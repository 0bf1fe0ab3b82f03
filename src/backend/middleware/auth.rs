/**
 * Authentication Middleware
 *
 * This module provides middleware for protecting routes that require
 * user authentication. It verifies the bearer access token through
 * `AuthSessionService::authorize` and provides the user ID to handlers.
 */

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::auth::service::AuthSessionService;
use crate::backend::error::AuthError;

/// Authenticated user data extracted from the access token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the bearer token from the Authorization header
/// 2. Verifies its signature and expiry
/// 3. Attaches the user id to request extensions for use in handlers
///
/// Returns 401 Unauthorized if the token is missing or invalid. No storage
/// lookup is made.
pub async fn auth_middleware(
    State(auth): State<Arc<AuthSessionService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user_id = auth.authorize(request.headers())?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser { user_id });

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user
///
/// Reads what `auth_middleware` stored; rejects with 401 on routes the
/// middleware did not run for.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                AuthError::Unauthorized
            })?;

        Ok(AuthUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::handlers::test_support::service;
    use axum::{
        body::Body,
        http::{header::AUTHORIZATION, Request as HttpRequest, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    async fn whoami(AuthUser(user): AuthUser) -> String {
        user.user_id.to_string()
    }

    fn app(auth: Arc<AuthSessionService>) -> Router {
        Router::new()
            .route("/me", get(whoami))
            .layer(from_fn_with_state(auth, auth_middleware))
    }

    #[tokio::test]
    async fn test_valid_token_passes() {
        let auth = service();
        auth.register("test@example.com", "password123").await.unwrap();
        let session = auth.login("test@example.com", "password123").await.unwrap();

        let response = app(auth)
            .oneshot(
                HttpRequest::builder()
                    .uri("/me")
                    .header(AUTHORIZATION, format!("Bearer {}", session.access_token.token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, session.user.id.to_string().as_bytes());
    }

    #[tokio::test]
    async fn test_missing_token_rejected() {
        let response = app(service())
            .oneshot(HttpRequest::builder().uri("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_token_rejected() {
        let response = app(service())
            .oneshot(
                HttpRequest::builder()
                    .uri("/me")
                    .header(AUTHORIZATION, "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_extractor_without_middleware() {
        let router: Router = Router::new().route("/me", get(whoami));
        let response = router
            .oneshot(HttpRequest::builder().uri("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
