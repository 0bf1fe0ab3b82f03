//! Authentication Module
//!
//! This module handles password authentication and the lifecycle of session
//! credentials: short-lived signed access tokens and long-lived opaque refresh
//! tokens that can be revoked.
//!
//! # Architecture
//!
//! The auth module is organized into focused submodules:
//!
//! - **`password`** - bcrypt hashing and verification
//! - **`sessions`** - signed access token issue and verification
//! - **`refresh_tokens`** - opaque refresh token issue, lookup and revocation
//! - **`credentials`** - `Authorization` header parsing
//! - **`service`** - login, authorize, refresh and revoke use cases
//! - **`users`** / **`db`** / **`memory`** - account model and stores
//! - **`handlers`** - HTTP handlers for the auth endpoints
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs            - Module exports and documentation
//! ├── clock.rs          - Injectable time source
//! ├── password.rs       - Password hashing
//! ├── sessions.rs       - Access tokens
//! ├── refresh_tokens.rs - Refresh tokens
//! ├── credentials.rs    - Header extraction
//! ├── service.rs        - AuthSessionService
//! ├── users.rs          - User model and store contract
//! ├── db.rs             - PostgreSQL store
//! ├── memory.rs         - In-memory store
//! └── handlers/         - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Login**: email and password verified → access token (1 hour) and refresh token (60 days) returned
//! 2. **Authorize**: bearer access token verified → user id
//! 3. **Refresh**: bearer refresh token looked up → new access token
//! 4. **Revoke**: bearer refresh token marked revoked → later refreshes fail
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Access tokens are HS256 JWTs checked with zero leeway
//! - Refresh tokens are 256-bit random values, never rotated
//! - Invalid credentials return 401 (no information leakage)
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chirpy_auth::backend::auth::{AuthSessionService, MemoryStore, SystemClock};
//! use chirpy_auth::backend::server::config::AuthConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AuthConfig::from_env()?;
//! let store = Arc::new(MemoryStore::new());
//! let auth = AuthSessionService::new(&config, store.clone(), store, Arc::new(SystemClock))?;
//!
//! let session = auth.login("walt@breakingbad.com", "04234").await?;
//! println!("access token: {}", session.access_token.token);
//! # Ok(())
//! # }
//! ```

/// Injectable time source
pub mod clock;

/// Password hashing and verification
pub mod password;

/// Signed access token issue and verification
pub mod sessions;

/// Opaque refresh token lifecycle
pub mod refresh_tokens;

/// `Authorization` header parsing
pub mod credentials;

/// User model and store contract
pub mod users;

/// PostgreSQL store
pub mod db;

/// In-memory store
pub mod memory;

/// Session use cases
pub mod service;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use clock::{Clock, ManualClock, SystemClock};
pub use credentials::{extract_api_key, extract_bearer, CredentialError};
pub use db::PgStore;
pub use handlers::types::{CreateUserRequest, LoginRequest, LoginResponse, TokenResponse, UserResponse};
pub use handlers::{create_user, login, refresh, revoke, update_user};
pub use memory::MemoryStore;
pub use password::{PasswordError, PasswordHasher};
pub use refresh_tokens::{RefreshToken, RefreshTokenError, RefreshTokenRepository, RefreshTokenStore};
pub use service::{AuthSessionService, LoginSession};
pub use sessions::{AccessToken, TokenError, TokenSigner};
pub use users::{User, UserRepository};
