/**
 * Login Handler
 *
 * This module implements the user authentication handler for POST /api/login.
 *
 * # Authentication Process
 *
 * 1. Look up user by email
 * 2. Verify password using bcrypt
 * 3. Issue an access token and a refresh token
 * 4. Return both tokens and the user info
 *
 * # Security
 *
 * - Unknown email and wrong password return the same 401 body
 * - User passwords are never returned in responses
 */
use std::sync::Arc;

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{LoginRequest, LoginResponse};
use crate::backend::auth::service::AuthSessionService;
use crate::backend::error::AuthError;

/// Login handler
///
/// # Errors
///
/// * `401 Unauthorized` - If user is not found or password is incorrect
/// * `500 Internal Server Error` - If storage or token generation fails
///
/// # Example Request
///
/// ```http
/// POST /api/login HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "email": "walt@breakingbad.com",
///   "password": "04234"
/// }
/// ```
///
/// # Example Response
///
/// ```json
/// {
///   "id": "123e4567-e89b-12d3-a456-426614174000",
///   "created_at": "2025-02-01T08:00:00Z",
///   "updated_at": "2025-02-01T08:00:00Z",
///   "email": "walt@breakingbad.com",
///   "is_chirpy_red": false,
///   "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
///   "refresh_token": "56aa826d22baab4b5ec2cea41a59ecbba03e542aedbb31d9b80326ac8ffcfa2a"
/// }
/// ```
pub async fn login(
    State(auth): State<Arc<AuthSessionService>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    tracing::info!("Login request for: {}", request.email);

    let session = auth.login(&request.email, &request.password).await?;

    Ok(Json(session.into()))
}
