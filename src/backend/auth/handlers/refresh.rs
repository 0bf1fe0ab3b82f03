/**
 * Token Handlers
 *
 * POST /api/refresh and POST /api/revoke. Both take the refresh token as
 * `Authorization: Bearer <token>` and carry no body.
 */
use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
};

use crate::backend::auth::handlers::types::TokenResponse;
use crate::backend::auth::service::AuthSessionService;
use crate::backend::error::AuthError;

/// Exchange a refresh token for a new access token
///
/// # Errors
///
/// * `401 Unauthorized` - token missing, unknown, expired or revoked
pub async fn refresh(
    State(auth): State<Arc<AuthSessionService>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AuthError> {
    let access_token = auth.refresh(&headers).await?;

    Ok(Json(TokenResponse {
        token: access_token.token,
    }))
}

/// Revoke a refresh token
///
/// Returns `204 No Content`, including when the token was already revoked.
pub async fn revoke(
    State(auth): State<Arc<AuthSessionService>>,
    headers: HeaderMap,
) -> Result<StatusCode, AuthError> {
    auth.revoke(&headers).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::handlers::test_support::{bearer, service};

    #[tokio::test]
    async fn test_refresh_and_revoke() {
        let auth = service();
        auth.register("test@example.com", "password123").await.unwrap();
        let session = auth.login("test@example.com", "password123").await.unwrap();
        let headers = bearer(&session.refresh_token.token);

        let Json(response) = refresh(State(auth.clone()), headers.clone()).await.unwrap();
        assert_eq!(
            auth.authorize(&bearer(&response.token)).unwrap(),
            session.user.id
        );

        assert_eq!(
            revoke(State(auth.clone()), headers.clone()).await.unwrap(),
            StatusCode::NO_CONTENT
        );
        assert_eq!(
            revoke(State(auth.clone()), headers.clone()).await.unwrap(),
            StatusCode::NO_CONTENT
        );
        assert_eq!(
            refresh(State(auth), headers).await.unwrap_err(),
            AuthError::Unauthorized
        );
    }

    #[tokio::test]
    async fn test_refresh_without_header() {
        assert_eq!(
            refresh(State(service()), HeaderMap::new()).await.unwrap_err(),
            AuthError::Unauthorized
        );
    }
}
