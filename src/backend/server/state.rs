/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` holds the one `AuthSessionService` built at startup. With
 * `DATABASE_URL` set the service runs on PostgreSQL; without it, on the
 * in-memory store.
 *
 * # State Extraction
 *
 * The `FromRef` implementation lets the auth handlers and middleware take
 * `State<Arc<AuthSessionService>>` while the router carries `AppState`.
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::auth::clock::{Clock, SystemClock};
use crate::backend::auth::db::PgStore;
use crate::backend::auth::memory::MemoryStore;
use crate::backend::auth::service::AuthSessionService;
use crate::backend::error::AuthError;
use crate::backend::server::config::{load_database, AuthConfig};

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Session service shared by every handler
    pub auth: Arc<AuthSessionService>,
}

impl AppState {
    /// Build state from configuration, choosing the store by `database_url`
    ///
    /// # Errors
    ///
    /// Database connection or migration failures are `AuthError::Internal`.
    pub async fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        match &config.database_url {
            Some(url) => {
                let pool = load_database(url).await.map_err(|e| {
                    tracing::error!("Failed to connect to database: {}", e);
                    AuthError::internal(e.to_string())
                })?;
                let store = Arc::new(PgStore::new(pool));
                let auth = AuthSessionService::new(config, store.clone(), store, clock)?;
                Ok(Self {
                    auth: Arc::new(auth),
                })
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory store");
                Self::in_memory(config, clock)
            }
        }
    }

    /// Build state on a fresh in-memory store
    pub fn in_memory(config: &AuthConfig, clock: Arc<dyn Clock>) -> Result<Self, AuthError> {
        let store = Arc::new(MemoryStore::with_clock(clock.clone()));
        let auth = AuthSessionService::new(config, store.clone(), store, clock)?;
        Ok(Self {
            auth: Arc::new(auth),
        })
    }
}

impl FromRef<AppState> for Arc<AuthSessionService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::handlers;
    use crate::backend::middleware::{auth_middleware, AuthUser};
    use axum::{
        body::Body,
        http::{header::{AUTHORIZATION, CONTENT_TYPE}, Request, StatusCode},
        middleware::from_fn_with_state,
        routing::{get, post},
        Router,
    };
    use tower::ServiceExt;

    fn state() -> AppState {
        let config = AuthConfig::builder()
            .jwt_secret("state-test-secret")
            .bcrypt_cost(4)
            .build()
            .unwrap();
        AppState::in_memory(&config, Arc::new(SystemClock)).unwrap()
    }

    #[tokio::test]
    async fn test_from_config_without_database() {
        let config = AuthConfig::builder()
            .jwt_secret("state-test-secret")
            .bcrypt_cost(4)
            .build()
            .unwrap();
        let state = AppState::from_config(&config).await.unwrap();

        state.auth.register("a@example.com", "pw").await.unwrap();
        assert!(state.auth.login("a@example.com", "pw").await.is_ok());
    }

    #[tokio::test]
    async fn test_handlers_extract_service_from_app_state() {
        let state = state();
        state.auth.register("a@example.com", "pw").await.unwrap();

        async fn me(AuthUser(user): AuthUser) -> String {
            user.user_id.to_string()
        }

        let app = Router::new()
            .route("/api/me", get(me))
            .route_layer(from_fn_with_state(state.clone(), auth_middleware))
            .route("/api/login", post(handlers::login))
            .with_state(state);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/login")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"email":"a@example.com","password":"pw"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let login: handlers::LoginResponse = serde_json::from_slice(&body).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/me")
                    .header(AUTHORIZATION, format!("Bearer {}", login.token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
