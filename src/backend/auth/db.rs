/**
 * PostgreSQL Store
 *
 * sqlx-backed implementation of the account and refresh token store
 * contracts. Each operation is a single statement, so concurrent revoke and
 * refresh calls on the same token see the database's atomic outcome.
 *
 * Timestamps are bound from the caller's clock rather than the database's
 * `now()`, keeping issuance, expiry and revocation on one time source.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::auth::refresh_tokens::{RefreshToken, RefreshTokenRepository};
use crate::backend::auth::users::{User, UserRepository};
use crate::backend::error::StoreError;

const USER_COLUMNS: &str = "id, created_at, updated_at, email, hashed_password, is_chirpy_red";

/// PostgreSQL account and refresh token store
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, StoreError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, created_at, updated_at, email, hashed_password)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(now)
        .bind(now)
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<User, StoreError> {
        let now = Utc::now();

        // RowNotFound from fetch_one becomes StoreError::NotFound
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET email = $1, hashed_password = $2, updated_at = $3
            WHERE id = $4
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(email)
        .bind(hashed_password)
        .bind(now)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn upgrade_user(&self, id: Uuid) -> Result<User, StoreError> {
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET is_chirpy_red = TRUE, updated_at = $1
            WHERE id = $2
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(now)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl RefreshTokenRepository for PgStore {
    async fn create_refresh_token(&self, token: &RefreshToken) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (token, user_id, created_at, updated_at, expires_at, revoked_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&token.token)
        .bind(token.user_id)
        .bind(token.created_at)
        .bind(token.updated_at)
        .bind(token.expires_at)
        .bind(token.revoked_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError> {
        let row = sqlx::query_as::<_, RefreshToken>(
            r#"
            SELECT token, user_id, created_at, updated_at, expires_at, revoked_at
            FROM refresh_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn revoke_refresh_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked_at = COALESCE(revoked_at, $2),
                updated_at = $2
            WHERE token = $1
            "#,
        )
        .bind(token)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
