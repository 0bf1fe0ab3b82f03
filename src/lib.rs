//! Chirpy Auth - Main Library
//!
//! Authentication and session-credential lifecycle for the Chirpy service:
//! bcrypt password verification, short-lived signed access tokens, and
//! long-lived revocable refresh tokens.
//!
//! # Overview
//!
//! - `backend::auth::AuthSessionService` - login, authorize, refresh, revoke
//! - `backend::auth::handlers` - thin axum handlers over the service
//! - `backend::middleware` - bearer token check for protected routes
//! - `backend::server` - configuration and shared state
//! - `backend::error` - error types and their HTTP mapping
//!
//! # Usage
//!
//! ```rust,no_run
//! use chirpy_auth::backend::server::{AppState, AuthConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AuthConfig::from_env()?;
//! let state = AppState::from_config(&config).await?;
//! let session = state.auth.login("walt@breakingbad.com", "04234").await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `AuthError` for caller-facing failures, one kind per operation
//! - `StoreError` for persistence, with a typed not-found
//! - Component errors (`PasswordError`, `TokenError`, `RefreshTokenError`,
//!   `CredentialError`) are logged and collapsed by the service

/// Backend server-side code
pub mod backend;
