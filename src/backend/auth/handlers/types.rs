/**
 * Authentication Handler Types
 *
 * This module defines the request and response bodies used by the auth
 * handlers. Field names follow the public API contract, so clients see
 * `token` and `refresh_token` at the top level of a login response.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::auth::service::LoginSession;
use crate::backend::auth::users::User;

/// Login request
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    /// User's email address
    pub email: String,
    /// User's password (verified against the stored hash)
    pub password: String,
}

/// Create or update user request
///
/// The same body serves registration and credential updates.
#[derive(Deserialize, Serialize, Debug)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
}

/// User response (without sensitive data)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_chirpy_red: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at,
            updated_at: user.updated_at,
            email: user.email,
            is_chirpy_red: user.is_chirpy_red,
        }
    }
}

/// Login response
///
/// The user fields are flattened next to both tokens.
#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    /// Signed access token (1 hour)
    pub token: String,
    /// Opaque refresh token (60 days)
    pub refresh_token: String,
}

impl From<LoginSession> for LoginResponse {
    fn from(session: LoginSession) -> Self {
        Self {
            user: session.user.into(),
            token: session.access_token.token,
            refresh_token: session.refresh_token.token,
        }
    }
}

/// Refresh response
#[derive(Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    pub token: String,
}
