/**
 * User Model and Account Store Contract
 *
 * This module defines the account record the auth core reads and the
 * operations it needs from the account store. The store owns the rows; the
 * core only references a user by ID and never sees a plaintext password.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::error::StoreError;

/// User struct representing a user in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: Uuid,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp
    pub updated_at: DateTime<Utc>,
    /// User email address
    pub email: String,
    /// Hashed password (bcrypt)
    #[serde(skip_serializing)]
    pub hashed_password: String,
    /// Paid membership flag
    pub is_chirpy_red: bool,
}

/// Account store operations used by the auth core
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user
    ///
    /// Returns `StoreError::Conflict` if the email is already registered.
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, StoreError>;

    /// Get user by email, `None` if not found
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Replace a user's email and password hash
    ///
    /// Returns `StoreError::NotFound` for an unknown ID and
    /// `StoreError::Conflict` if the email belongs to another account.
    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<User, StoreError>;

    /// Grant the paid membership
    ///
    /// Returns `StoreError::NotFound` for an unknown ID.
    async fn upgrade_user(&self, id: Uuid) -> Result<User, StoreError>;
}
