/**
 * User Handlers
 *
 * POST /api/users registers an account. PUT /api/users replaces the email
 * and password of the account named by the bearer access token.
 */
use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
};

use crate::backend::auth::handlers::types::{CreateUserRequest, UserResponse};
use crate::backend::auth::service::AuthSessionService;
use crate::backend::error::AuthError;

/// Registration handler
///
/// # Errors
///
/// * `409 Conflict` - email already registered
/// * `500 Internal Server Error` - hashing or storage failed
pub async fn create_user(
    State(auth): State<Arc<AuthSessionService>>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AuthError> {
    tracing::info!("Signup request for: {}", request.email);

    let user = auth.register(&request.email, &request.password).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Credential update handler
///
/// # Errors
///
/// * `401 Unauthorized` - missing or invalid access token
/// * `409 Conflict` - new email belongs to another account
pub async fn update_user(
    State(auth): State<Arc<AuthSessionService>>,
    headers: HeaderMap,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<UserResponse>, AuthError> {
    let user = auth
        .update_credentials(&headers, &request.email, &request.password)
        .await?;

    Ok(Json(user.into()))
}
