//! Backend Error Module
//!
//! This module defines the error types that leave the auth components and
//! their conversion into HTTP responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - AuthError and StoreError
//! └── conversion.rs - IntoResponse for AuthError
//! ```
//!
//! Component-level errors (`PasswordError`, `TokenError`, `CredentialError`,
//! `RefreshTokenError`) live next to their components and are collapsed into
//! `AuthError` by the session service.

pub mod types;
pub mod conversion;

pub use types::{AuthError, StoreError};
