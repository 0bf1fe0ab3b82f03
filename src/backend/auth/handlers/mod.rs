//! Authentication Handlers Module
//!
//! This module contains the HTTP handlers for the auth endpoints. Each one
//! decodes the request, calls `AuthSessionService` and encodes the result;
//! failures become JSON error bodies through `AuthError`'s `IntoResponse`.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports and documentation
//! ├── types.rs    - Request and response types
//! ├── login.rs    - User authentication handler
//! ├── refresh.rs  - Refresh and revoke handlers
//! └── users.rs    - Registration and credential update handlers
//! ```
//!
//! # Handlers
//!
//! - **`create_user`** - POST /api/users - User registration
//! - **`update_user`** - PUT /api/users - Change email and password
//! - **`login`** - POST /api/login - User authentication
//! - **`refresh`** - POST /api/refresh - New access token
//! - **`revoke`** - POST /api/revoke - Revoke a refresh token
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use axum::{routing::{post, put}, Router};
//! use chirpy_auth::backend::auth::{handlers, AuthSessionService};
//!
//! # fn example(auth: Arc<AuthSessionService>) {
//! let router: Router = Router::new()
//!     .route("/api/users", post(handlers::create_user).put(handlers::update_user))
//!     .route("/api/login", post(handlers::login))
//!     .route("/api/refresh", post(handlers::refresh))
//!     .route("/api/revoke", post(handlers::revoke))
//!     .with_state(auth);
//! # }
//! ```

/// Request and response types
pub mod types;

/// Login handler
pub mod login;

/// Refresh and revoke handlers
pub mod refresh;

/// Registration and credential update handlers
pub mod users;

pub use types::{CreateUserRequest, LoginRequest, LoginResponse, TokenResponse, UserResponse};

pub use login::login;
pub use refresh::{refresh, revoke};
pub use users::{create_user, update_user};
