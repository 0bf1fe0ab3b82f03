//! Common test utilities and helpers
//!
//! Builds an `AuthSessionService` on the in-memory store with a manual clock
//! so expiry can be exercised without sleeping.

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue};
use chrono::{DateTime, TimeZone, Utc};
use chirpy_auth::backend::auth::{AuthSessionService, Clock, LoginSession, ManualClock, MemoryStore};
use chirpy_auth::backend::server::{AppState, AuthConfig};

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_API_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

/// Service, store and clock sharing one simulated timeline
pub struct TestContext {
    pub auth: Arc<AuthSessionService>,
    pub store: Arc<MemoryStore>,
    pub clock: ManualClock,
}

/// Test user credentials
pub struct TestUser {
    pub email: String,
    pub password: String,
    pub session: LoginSession,
}

pub fn test_config() -> AuthConfig {
    config_with_secret(TEST_SECRET)
}

pub fn config_with_secret(secret: &str) -> AuthConfig {
    AuthConfig::builder()
        .jwt_secret(secret)
        .polka_key(TEST_API_KEY)
        .bcrypt_cost(4)
        .build()
        .expect("test config is valid")
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(&test_config())
    }

    pub fn new_with_secret(secret: &str) -> Self {
        Self::with_config(&config_with_secret(secret))
    }

    pub fn with_config(config: &AuthConfig) -> Self {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap());
        let store = Arc::new(MemoryStore::with_clock(Arc::new(clock.clone())));
        let auth = AuthSessionService::new(
            config,
            store.clone(),
            store.clone(),
            Arc::new(clock.clone()),
        )
        .expect("service builds");

        Self {
            auth: Arc::new(auth),
            store,
            clock,
        }
    }

    pub fn clock_now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Application state sharing this context's service
    pub fn app_state(&self) -> AppState {
        AppState {
            auth: self.auth.clone(),
        }
    }

    /// Register and log in a user
    pub async fn create_test_user(&self, email: &str, password: &str) -> TestUser {
        self.auth
            .register(email, password)
            .await
            .expect("registration succeeds");
        let session = self
            .auth
            .login(email, password)
            .await
            .expect("login succeeds");

        TestUser {
            email: email.to_string(),
            password: password.to_string(),
            session,
        }
    }
}

pub fn bearer(token: &str) -> HeaderMap {
    authorization(&format!("Bearer {}", token))
}

pub fn api_key(key: &str) -> HeaderMap {
    authorization(&format!("ApiKey {}", key))
}

pub fn authorization(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    headers
}
