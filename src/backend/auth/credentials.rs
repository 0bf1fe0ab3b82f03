/**
 * Credential Extraction
 *
 * Parses trust material out of the `Authorization` header. Both schemes
 * share the header, so each endpoint must know which extractor applies:
 *
 * - `Bearer <token>` for access and refresh tokens
 * - `ApiKey <key>` for the billing webhook
 *
 * Matching is case-sensitive, the scheme and value are separated by exactly
 * one space, and the value may not contain whitespace. Header names are
 * case-insensitive through `HeaderMap`.
 */

use axum::http::{header::AUTHORIZATION, HeaderMap};
use thiserror::Error;

const BEARER_SCHEME: &str = "Bearer ";
const API_KEY_SCHEME: &str = "ApiKey ";

/// Credential extraction errors
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    /// No `Authorization` header, or an empty one
    #[error("Authorization header missing")]
    MissingHeader,

    /// Header present but not in the expected scheme
    #[error("Unsupported Authorization scheme")]
    BadScheme,
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, CredentialError> {
    extract_scheme(headers, BEARER_SCHEME)
}

/// Extract the key from `Authorization: ApiKey <key>`
pub fn extract_api_key(headers: &HeaderMap) -> Result<&str, CredentialError> {
    extract_scheme(headers, API_KEY_SCHEME)
}

fn extract_scheme<'a>(headers: &'a HeaderMap, scheme: &str) -> Result<&'a str, CredentialError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(CredentialError::MissingHeader)?;

    if value.is_empty() {
        return Err(CredentialError::MissingHeader);
    }

    let value = value.to_str().map_err(|_| CredentialError::BadScheme)?;
    let credential = value
        .strip_prefix(scheme)
        .ok_or(CredentialError::BadScheme)?;

    if credential.is_empty() || credential.chars().any(char::is_whitespace) {
        return Err(CredentialError::BadScheme);
    }

    Ok(credential)
}
