/**
 * In-Memory Store
 *
 * A process-local implementation of the account and refresh token store
 * contracts. Each operation takes the relevant lock once, so the
 * check-and-update inside a single call is atomic, matching what the
 * PostgreSQL store gets from single-statement updates.
 *
 * Used by the test suites and for running without a database.
 */

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::auth::clock::{Clock, SystemClock};
use crate::backend::auth::refresh_tokens::{RefreshToken, RefreshTokenRepository};
use crate::backend::auth::users::{User, UserRepository};
use crate::backend::error::StoreError;

/// In-memory account and refresh token store
#[derive(Clone)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    refresh_tokens: Arc<RwLock<HashMap<String, RefreshToken>>>,
    clock: Arc<dyn Clock>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store stamped by the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty store stamped by `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            refresh_tokens: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// Number of refresh token rows, including revoked and expired ones
    pub async fn refresh_token_count(&self) -> usize {
        self.refresh_tokens.read().await.len()
    }
}

fn email_taken(users: &HashMap<Uuid, User>, email: &str, except: Option<Uuid>) -> bool {
    users
        .values()
        .any(|u| u.email == email && Some(u.id) != except)
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if email_taken(&users, email, None) {
            return Err(StoreError::Conflict(format!("email {} already registered", email)));
        }

        let now = self.clock.now();
        let user = User {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            is_chirpy_red: false,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if email_taken(&users, email, Some(id)) {
            return Err(StoreError::Conflict(format!("email {} already registered", email)));
        }

        let now = self.clock.now();
        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.email = email.to_string();
        user.hashed_password = hashed_password.to_string();
        user.updated_at = now;
        Ok(user.clone())
    }

    async fn upgrade_user(&self, id: Uuid) -> Result<User, StoreError> {
        let now = self.clock.now();
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.is_chirpy_red = true;
        user.updated_at = now;
        Ok(user.clone())
    }
}

#[async_trait]
impl RefreshTokenRepository for MemoryStore {
    async fn create_refresh_token(&self, token: &RefreshToken) -> Result<(), StoreError> {
        let mut tokens = self.refresh_tokens.write().await;
        if tokens.contains_key(&token.token) {
            return Err(StoreError::Conflict("duplicate refresh token".to_string()));
        }
        tokens.insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn get_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError> {
        Ok(self.refresh_tokens.read().await.get(token).cloned())
    }

    async fn revoke_refresh_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut tokens = self.refresh_tokens.write().await;
        let row = tokens.get_mut(token).ok_or(StoreError::NotFound)?;
        row.revoked_at.get_or_insert(now);
        row.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Duration;

    #[tokio::test]
    async fn test_create_and_get_user() {
        let store = MemoryStore::new();
        let user = store.create_user("walt@breakingbad.com", "hash").await.unwrap();

        let by_email = store.get_user_by_email("walt@breakingbad.com").await.unwrap();

        assert_eq!(by_email, Some(user.clone()));
        assert!(!user.is_chirpy_red);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        store.create_user("a@example.com", "hash").await.unwrap();
        assert_matches!(
            store.create_user("a@example.com", "hash").await,
            Err(StoreError::Conflict(_))
        );
    }

    #[tokio::test]
    async fn test_missing_user_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get_user_by_email("ghost@example.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_user() {
        let store = MemoryStore::new();
        let user = store.create_user("old@example.com", "old").await.unwrap();

        let updated = store.update_user(user.id, "new@example.com", "new").await.unwrap();

        assert_eq!(updated.email, "new@example.com");
        assert_eq!(updated.hashed_password, "new");
        assert_eq!(store.get_user_by_email("old@example.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_to_taken_email_conflicts() {
        let store = MemoryStore::new();
        store.create_user("taken@example.com", "h").await.unwrap();
        let user = store.create_user("me@example.com", "h").await.unwrap();

        assert_matches!(
            store.update_user(user.id, "taken@example.com", "h").await,
            Err(StoreError::Conflict(_))
        );
        // Keeping one's own email is fine
        assert!(store.update_user(user.id, "me@example.com", "h2").await.is_ok());
    }

    #[tokio::test]
    async fn test_upgrade_unknown_user_is_not_found() {
        let store = MemoryStore::new();
        assert_eq!(store.upgrade_user(Uuid::new_v4()).await, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_upgrade_user() {
        let store = MemoryStore::new();
        let user = store.create_user("a@example.com", "h").await.unwrap();
        let upgraded = store.upgrade_user(user.id).await.unwrap();
        assert!(upgraded.is_chirpy_red);
    }

    #[tokio::test]
    async fn test_refresh_token_rows() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let row = RefreshToken {
            token: "abc".to_string(),
            user_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            expires_at: now + Duration::days(1),
            revoked_at: None,
        };

        store.create_refresh_token(&row).await.unwrap();
        assert_matches!(
            store.create_refresh_token(&row).await,
            Err(StoreError::Conflict(_))
        );
        assert_eq!(store.refresh_token_count().await, 1);

        let later = now + Duration::minutes(1);
        store.revoke_refresh_token("abc", later).await.unwrap();
        let stored = store.get_refresh_token("abc").await.unwrap().unwrap();
        assert_eq!(stored.revoked_at, Some(later));
        assert_eq!(stored.updated_at, later);

        assert_eq!(
            store.revoke_refresh_token("missing", later).await,
            Err(StoreError::NotFound)
        );
    }
}
