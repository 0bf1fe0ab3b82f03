/**
 * Backend Error Types
 *
 * This module defines the errors that cross component boundaries in the
 * backend: the caller-facing `AuthError` returned by the session service,
 * and the `StoreError` returned by storage collaborators.
 *
 * # Error Categories
 *
 * ## Auth Errors
 *
 * Every security-relevant distinction (why a token or password was
 * rejected) collapses into one variant per operation:
 * - Bad email/password pairs -> `InvalidCredentials`
 * - Missing, malformed, expired, revoked or forged tokens -> `Unauthorized`
 *
 * The internal cause is logged where the failure happens, never carried here.
 *
 * ## Store Errors
 *
 * Storage failures are typed so callers can branch on `NotFound` or
 * `Conflict` without inspecting messages.
 */

use axum::http::StatusCode;
use thiserror::Error;

/// Caller-facing authentication errors
///
/// This is the closed set of outcomes `AuthSessionService` reports.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or wrong password
    #[error("Incorrect email or password")]
    InvalidCredentials,

    /// Missing, malformed, expired, revoked or forged credential
    #[error("Unauthorized")]
    Unauthorized,

    /// Registration or update with an email that already belongs to an account
    #[error("Email already registered")]
    EmailTaken,

    /// Referenced account does not exist
    #[error("User not found")]
    UserNotFound,

    /// Storage, hashing or signing failure not attributable to the caller
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `InvalidCredentials` - 401 Unauthorized
    /// - `Unauthorized` - 401 Unauthorized
    /// - `EmailTaken` - 409 Conflict
    /// - `UserNotFound` - 404 Not Found
    /// - `Internal` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::EmailTaken => StatusCode::CONFLICT,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the message safe to show to a client
    ///
    /// Internal details are replaced with a generic message.
    pub fn message(&self) -> String {
        match self {
            Self::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

/// Errors reported by storage collaborators
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The addressed row does not exist
    #[error("Record not found")]
    NotFound,

    /// A uniqueness constraint was violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backing store failed
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict(db.message().to_string())
            }
            _ => Self::Backend(err.to_string()),
        }
    }
}
