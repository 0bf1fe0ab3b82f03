/**
 * Access Tokens
 *
 * This module issues and verifies the short-lived signed access tokens
 * (HS256 JWTs) that authenticate individual requests.
 *
 * Verification is a pure function of the token, the signing secret and the
 * injected clock. There is no persisted state, which is why an access token
 * cannot be revoked on its own: it stops working when it expires. Anything
 * that needs real revocation goes through the refresh token store.
 *
 * Signature and expiry are independent checks and both must pass. Clock skew
 * leeway is zero: a token is expired from the second `exp` is reached.
 */

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::backend::auth::clock::Clock;

/// Issuer claim stamped on, and required of, every access token
pub const TOKEN_ISSUER: &str = "chirpy-access";

/// Access token errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// `now >= exp`, regardless of signature validity
    #[error("Token has expired")]
    Expired,

    /// Signature does not match the payload under this secret
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Token is not a structurally valid access token
    #[error("Malformed token: {0}")]
    Malformed(String),

    /// Token could not be produced
    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer
    pub iss: String,
    /// User ID
    pub sub: String,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// A freshly issued access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// Compact JWT, safe for an HTTP header
    pub token: String,
    /// Identity the token speaks for
    pub subject: Uuid,
    /// Issue instant, truncated to whole seconds
    ///
    /// `iat` and `exp` are Unix seconds, so the sub-second part of the clock is
    /// dropped before the ttl is added. Under a sub-second clock the token
    /// lives up to one second less than the ttl.
    pub issued_at: DateTime<Utc>,
    /// Expiry instant (`issued_at + ttl`), truncated to whole seconds
    ///
    /// No leeway applies: the token is rejected from this second on.
    pub expires_at: DateTime<Utc>,
}

/// Stateless signer/verifier for access tokens
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    clock: Arc<dyn Clock>,
}

impl TokenSigner {
    /// Create a signer for a symmetric secret
    pub fn new(secret: &str, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            clock,
        }
    }

    /// Issue an access token for `subject` valid for `ttl`
    ///
    /// # Arguments
    /// * `subject` - User ID the token will carry
    /// * `ttl` - Lifetime from now
    ///
    /// # Returns
    /// The signed token with its issue and expiry instants
    pub fn issue(&self, subject: Uuid, ttl: Duration) -> Result<AccessToken, TokenError> {
        let iat = self.clock.now().timestamp();
        let exp = iat
            .checked_add(ttl.num_seconds())
            .ok_or_else(|| TokenError::Signing("token lifetime out of range".to_string()))?;

        let claims = Claims {
            iss: TOKEN_ISSUER.to_string(),
            sub: subject.to_string(),
            iat,
            exp,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(AccessToken {
            token,
            subject,
            issued_at: timestamp(iat)?,
            expires_at: timestamp(exp)?,
        })
    }

    /// Verify a token and return its subject
    ///
    /// # Errors
    /// * `InvalidSignature` - signed with another secret or tampered with
    /// * `Expired` - authentic but `now >= exp`
    /// * `Malformed` - anything else structurally wrong
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against the injected clock.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed(e.to_string()),
            }
        })?;
        let claims = data.claims;

        if self.clock.now().timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Uuid::parse_str(&claims.sub)
            .map_err(|e| TokenError::Malformed(format!("Invalid user ID in token: {}", e)))
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, TokenError> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| TokenError::Signing(format!("timestamp {} out of range", secs)))
}
