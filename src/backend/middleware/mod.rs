//! Middleware Module
//!
//! HTTP middleware that runs before handlers.
//!
//! - **`auth`** - bearer access token check for protected routes
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use axum::{middleware::from_fn_with_state, routing::get, Router};
//! use chirpy_auth::backend::auth::AuthSessionService;
//! use chirpy_auth::backend::middleware::{auth_middleware, AuthUser};
//!
//! async fn me(AuthUser(user): AuthUser) -> String {
//!     user.user_id.to_string()
//! }
//!
//! # fn example(auth: Arc<AuthSessionService>) {
//! let protected: Router = Router::new()
//!     .route("/api/me", get(me))
//!     .layer(from_fn_with_state(auth, auth_middleware));
//! # }
//! ```

pub mod auth;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser};
