//! Backend Module
//!
//! This module contains the server-side authentication code.
//!
//! # Architecture
//!
//! The backend is organized into focused submodules:
//!
//! - **`auth`** - Password hashing, tokens, session service, handlers
//! - **`middleware`** - Request processing middleware
//! - **`server`** - Configuration and application state
//! - **`error`** - Backend-specific error types
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Admin command-line entry point
//! ├── auth/           - Authentication
//! ├── middleware/     - Request middleware
//! ├── server/         - Configuration and state
//! └── error/          - Error types
//! ```
//!
//! # Thread Safety
//!
//! All backend code is designed for concurrent access:
//! - `AuthSessionService` is shared as `Arc` and holds no mutable state
//! - Stores serialize conflicting updates (row-level in PostgreSQL, `RwLock` in memory)
//! - bcrypt work runs on the blocking pool, off the async executor
//!
//! # Error Handling
//!
//! - `AuthError` for caller-facing failures, rendered as JSON by `IntoResponse`
//! - `StoreError` for persistence failures
//! - Proper error propagation with `?` operator

/// Authentication and session credentials
pub mod auth;

/// Backend error types
pub mod error;

/// Middleware for request processing
pub mod middleware;

/// Configuration and application state
pub mod server;

pub use auth::AuthSessionService;
pub use error::{AuthError, StoreError};
pub use server::{AppState, AuthConfig};
