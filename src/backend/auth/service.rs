/**
 * Auth Session Service
 *
 * The one entry point the rest of the system calls. It composes the password
 * hasher, the access token signer and the refresh token store into the login,
 * authorize, refresh and revoke use cases, plus the account operations that
 * need the same primitives.
 *
 * # Session Lifecycle
 *
 * ```text
 * Anonymous --login--> Authenticated (access + refresh token)
 *     access token expires --refresh--> new access token, same refresh token
 *     revoke, or refresh token expiry --> Anonymous
 * ```
 *
 * # Error Collapsing
 *
 * Every failure cause is logged here and then collapsed to one caller-facing
 * kind per operation: `InvalidCredentials` for login, `Unauthorized` for
 * token checks, `Internal` for infrastructure. Callers can pick a status code
 * but cannot learn which validation step failed.
 */

use std::sync::Arc;

use axum::http::HeaderMap;
use chrono::Duration;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::backend::auth::clock::Clock;
use crate::backend::auth::credentials::{extract_api_key, extract_bearer};
use crate::backend::auth::password::{PasswordError, PasswordHasher};
use crate::backend::auth::refresh_tokens::{
    default_refresh_token_ttl, RefreshToken, RefreshTokenError, RefreshTokenRepository,
    RefreshTokenStore,
};
use crate::backend::auth::sessions::{AccessToken, TokenSigner};
use crate::backend::auth::users::{User, UserRepository};
use crate::backend::error::{AuthError, StoreError};
use crate::backend::server::config::AuthConfig;

/// Access token lifetime in seconds
pub const ACCESS_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Access token lifetime
pub fn default_access_token_ttl() -> Duration {
    Duration::seconds(ACCESS_TOKEN_TTL_SECS)
}

// Verified against when the email is unknown so both login failures cost the same.
const DUMMY_PASSWORD: &str = "timing-equalisation-only";

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginSession {
    /// The authenticated account
    pub user: User,
    /// Short-lived access token
    pub access_token: AccessToken,
    /// Long-lived refresh token
    pub refresh_token: RefreshToken,
}

/// Authentication and session-credential service
pub struct AuthSessionService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    signer: TokenSigner,
    refresh_tokens: RefreshTokenStore,
    api_key: Option<String>,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
    dummy_hash: String,
}

impl AuthSessionService {
    /// Build the service from startup configuration
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Internal` if the hasher rejects the configured cost.
    pub fn new(
        config: &AuthConfig,
        users: Arc<dyn UserRepository>,
        refresh_tokens: Arc<dyn RefreshTokenRepository>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AuthError> {
        let hasher = PasswordHasher::new(config.bcrypt_cost)
            .map_err(|e| AuthError::internal(e.to_string()))?;
        let dummy_hash = hasher
            .hash(DUMMY_PASSWORD)
            .map_err(|e| AuthError::internal(e.to_string()))?;

        Ok(Self {
            users,
            hasher,
            signer: TokenSigner::new(&config.jwt_secret, clock.clone()),
            refresh_tokens: RefreshTokenStore::new(refresh_tokens, clock),
            api_key: config.polka_key.clone(),
            access_token_ttl: default_access_token_ttl(),
            refresh_token_ttl: default_refresh_token_ttl(),
            dummy_hash,
        })
    }

    /// Create an account with a hashed password
    ///
    /// # Errors
    /// * `EmailTaken` - the email already belongs to an account
    /// * `Internal` - hashing or storage failed
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let hashed = self.hash_password(password).await?;

        let user = self
            .users
            .create_user(email, &hashed)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::EmailTaken,
                other => {
                    tracing::error!("Failed to create user: {}", other);
                    AuthError::internal(other.to_string())
                }
            })?;

        tracing::info!("User registered: {}", user.id);
        Ok(user)
    }

    /// Authenticate an email/password pair and open a session
    ///
    /// Unknown email and wrong password both return `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginSession, AuthError> {
        let user = self.users.get_user_by_email(email).await.map_err(|e| {
            tracing::error!("Database error during login: {}", e);
            AuthError::internal(e.to_string())
        })?;

        let user = match user {
            Some(user) => {
                if let Err(e) = self.verify_password(password, &user.hashed_password).await? {
                    tracing::warn!("Login rejected for user {}: {}", user.id, e);
                    return Err(AuthError::InvalidCredentials);
                }
                user
            }
            None => {
                // Result is irrelevant; only the work matters.
                let _ = self.verify_password(password, &self.dummy_hash).await?;
                tracing::warn!("Login rejected: unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let access_token = self
            .signer
            .issue(user.id, self.access_token_ttl)
            .map_err(|e| {
                tracing::error!("Failed to create access token: {}", e);
                AuthError::internal(e.to_string())
            })?;

        let refresh_token = self
            .refresh_tokens
            .issue(user.id, self.refresh_token_ttl)
            .await
            .map_err(|e| {
                tracing::error!("Failed to save refresh token: {}", e);
                AuthError::internal(e.to_string())
            })?;

        tracing::info!("User logged in successfully: {}", user.id);

        Ok(LoginSession {
            user,
            access_token,
            refresh_token,
        })
    }

    /// Authenticate a request by its bearer access token
    ///
    /// Pure with respect to storage: only the signature and expiry are checked.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<Uuid, AuthError> {
        let token = extract_bearer(headers).map_err(|e| {
            tracing::warn!("Authorization rejected: {}", e);
            AuthError::Unauthorized
        })?;

        self.signer.verify(token).map_err(|e| {
            tracing::warn!("Authorization rejected: {}", e);
            AuthError::Unauthorized
        })
    }

    /// Mint a new access token from a bearer refresh token
    ///
    /// The refresh token itself is not rotated.
    pub async fn refresh(&self, headers: &HeaderMap) -> Result<AccessToken, AuthError> {
        let token = extract_bearer(headers).map_err(|e| {
            tracing::warn!("Refresh rejected: {}", e);
            AuthError::Unauthorized
        })?;

        let user_id = self
            .refresh_tokens
            .resolve_identity(token)
            .await
            .map_err(|e| match e {
                RefreshTokenError::Persistence(detail) => {
                    tracing::error!("Refresh token lookup failed: {}", detail);
                    AuthError::Internal(detail)
                }
                other => {
                    tracing::warn!("Refresh rejected: {}", other);
                    AuthError::Unauthorized
                }
            })?;

        let access_token = self
            .signer
            .issue(user_id, self.access_token_ttl)
            .map_err(|e| {
                tracing::error!("Failed to create access token: {}", e);
                AuthError::internal(e.to_string())
            })?;

        tracing::info!("Access token refreshed for user {}", user_id);
        Ok(access_token)
    }

    /// Revoke the bearer refresh token; revoking twice succeeds
    pub async fn revoke(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let token = extract_bearer(headers).map_err(|e| {
            tracing::warn!("Revoke rejected: {}", e);
            AuthError::Unauthorized
        })?;

        self.refresh_tokens.revoke(token).await.map_err(|e| match e {
            RefreshTokenError::Persistence(detail) => {
                tracing::error!("Failed to revoke token: {}", detail);
                AuthError::Internal(detail)
            }
            other => {
                tracing::warn!("Revoke rejected: {}", other);
                AuthError::Unauthorized
            }
        })?;

        tracing::info!("Refresh token revoked");
        Ok(())
    }

    /// Replace the caller's email and password
    ///
    /// The caller is identified by a bearer access token.
    pub async fn update_credentials(
        &self,
        headers: &HeaderMap,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let user_id = self.authorize(headers)?;
        let hashed = self.hash_password(password).await?;

        let user = self
            .users
            .update_user(user_id, email, &hashed)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::EmailTaken,
                // Token outlived its account
                StoreError::NotFound => AuthError::Unauthorized,
                other => {
                    tracing::error!("Failed to update user {}: {}", user_id, other);
                    AuthError::internal(other.to_string())
                }
            })?;

        tracing::info!("Credentials updated for user {}", user.id);
        Ok(user)
    }

    /// Authenticate a webhook call by its `ApiKey` header
    ///
    /// Fails with `Unauthorized` when no key is configured.
    pub fn authorize_api_key(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let presented = extract_api_key(headers).map_err(|e| {
            tracing::warn!("API key rejected: {}", e);
            AuthError::Unauthorized
        })?;

        let expected = self.api_key.as_deref().ok_or_else(|| {
            tracing::warn!("API key rejected: no key configured");
            AuthError::Unauthorized
        })?;

        if bool::from(presented.as_bytes().ct_eq(expected.as_bytes())) {
            Ok(())
        } else {
            tracing::warn!("API key rejected: mismatch");
            Err(AuthError::Unauthorized)
        }
    }

    /// Grant the paid membership on behalf of the billing webhook
    ///
    /// # Errors
    /// * `Unauthorized` - API key missing or wrong
    /// * `UserNotFound` - no account with `user_id`
    pub async fn upgrade_user(&self, headers: &HeaderMap, user_id: Uuid) -> Result<User, AuthError> {
        self.authorize_api_key(headers)?;

        let user = self.users.upgrade_user(user_id).await.map_err(|e| match e {
            StoreError::NotFound => AuthError::UserNotFound,
            other => {
                tracing::error!("Failed to upgrade user {}: {}", user_id, other);
                AuthError::internal(other.to_string())
            }
        })?;

        tracing::info!("User {} upgraded", user.id);
        Ok(user)
    }

    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.hasher;
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::internal(format!("hashing task failed: {}", e)))?
            .map_err(|e| {
                tracing::error!("Failed to hash password: {}", e);
                AuthError::internal(e.to_string())
            })
    }

    // Outer error: the blocking task itself failed. Inner: the verdict.
    async fn verify_password(
        &self,
        password: &str,
        hashed: &str,
    ) -> Result<Result<(), PasswordError>, AuthError> {
        let hasher = self.hasher;
        let password = password.to_owned();
        let hashed = hashed.to_owned();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hashed))
            .await
            .map_err(|e| AuthError::internal(format!("verification task failed: {}", e)))
    }
}
