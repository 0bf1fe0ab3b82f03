/**
 * Refresh Tokens
 *
 * Refresh tokens are the only long-lived, revocable credential. Each is an
 * opaque 256-bit random string persisted by the storage collaborator with
 * its owner, timestamps and a nullable `revoked_at`.
 *
 * A token grants access iff `expires_at > now` and `revoked_at` is null.
 * Rows are never deleted here; revocation is a soft update, and expired rows
 * simply stop resolving.
 *
 * Validity is re-read from storage on every call. Concurrent revoke/refresh
 * races are settled by the store's atomic updates.
 */

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::backend::auth::clock::Clock;
use crate::backend::error::StoreError;

/// Random bytes per refresh token (256 bits of entropy)
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Refresh token lifetime in days
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 60;

/// Refresh token lifetime
pub fn default_refresh_token_ttl() -> Duration {
    Duration::days(REFRESH_TOKEN_TTL_DAYS)
}

/// Refresh token row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RefreshToken {
    /// Opaque token value (hex)
    pub token: String,
    /// Owning user
    pub user_id: Uuid,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp
    pub updated_at: DateTime<Utc>,
    /// Expiry timestamp
    pub expires_at: DateTime<Utc>,
    /// Revocation timestamp, if revoked
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    /// Whether the token may mint access tokens at `now`
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now && self.revoked_at.is_none()
    }
}

/// Refresh token persistence operations
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Insert a new row
    async fn create_refresh_token(&self, token: &RefreshToken) -> Result<(), StoreError>;

    /// Fetch a row by token value
    async fn get_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError>;

    /// Set `updated_at = now` and `revoked_at = now` unless already revoked
    ///
    /// Returns `StoreError::NotFound` if no row has this token value.
    async fn revoke_refresh_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}

/// Refresh token errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RefreshTokenError {
    /// Unknown, expired or revoked, deliberately indistinguishable
    #[error("Refresh token is invalid")]
    Invalid,

    /// Revocation addressed a token that was never issued
    #[error("Refresh token not found")]
    NotFound,

    /// Expiry would fall outside the representable time range
    #[error("Refresh token lifetime out of range")]
    LifetimeOutOfRange,

    /// The backing store failed
    #[error("Refresh token persistence failed: {0}")]
    Persistence(String),
}

/// Generate a cryptographically secure opaque token
///
/// # Returns
/// 64 lowercase hex characters from 32 bytes of OS entropy
pub fn generate_refresh_token() -> String {
    let mut buffer = [0u8; REFRESH_TOKEN_BYTES];
    OsRng.fill_bytes(&mut buffer);
    hex::encode(buffer)
}

/// Issues, resolves and revokes refresh tokens
#[derive(Clone)]
pub struct RefreshTokenStore {
    repo: Arc<dyn RefreshTokenRepository>,
    clock: Arc<dyn Clock>,
}

impl RefreshTokenStore {
    /// Create a store over a repository
    pub fn new(repo: Arc<dyn RefreshTokenRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Issue and persist a new token for `user_id`
    ///
    /// Fails with `LifetimeOutOfRange` before touching storage if `now + ttl`
    /// overflows.
    pub async fn issue(&self, user_id: Uuid, ttl: Duration) -> Result<RefreshToken, RefreshTokenError> {
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or(RefreshTokenError::LifetimeOutOfRange)?;
        let token = RefreshToken {
            token: generate_refresh_token(),
            user_id,
            created_at: now,
            updated_at: now,
            expires_at,
            revoked_at: None,
        };

        self.repo
            .create_refresh_token(&token)
            .await
            .map_err(|e| RefreshTokenError::Persistence(e.to_string()))?;

        tracing::debug!("Issued refresh token for user {}", user_id);
        Ok(token)
    }

    /// Resolve a token to its owner if it is still usable
    pub async fn resolve_identity(&self, token: &str) -> Result<Uuid, RefreshTokenError> {
        let row = self
            .repo
            .get_refresh_token(token)
            .await
            .map_err(|e| RefreshTokenError::Persistence(e.to_string()))?;

        match row {
            Some(row) if row.is_usable_at(self.clock.now()) => Ok(row.user_id),
            Some(row) => {
                tracing::debug!(
                    "Refresh token for user {} rejected (revoked: {})",
                    row.user_id,
                    row.revoked_at.is_some()
                );
                Err(RefreshTokenError::Invalid)
            }
            None => Err(RefreshTokenError::Invalid),
        }
    }

    /// Revoke a token; revoking twice is not an error
    pub async fn revoke(&self, token: &str) -> Result<(), RefreshTokenError> {
        self.repo
            .revoke_refresh_token(token, self.clock.now())
            .await
            .map_err(|e| match e {
                StoreError::NotFound => RefreshTokenError::NotFound,
                other => RefreshTokenError::Persistence(other.to_string()),
            })
    }
}
