/**
 * Password Hashing
 *
 * One-way credential hashing and verification using bcrypt. The salt is
 * generated per call and embedded in the modular-crypt output, so no
 * separate salt storage is needed.
 *
 * Both operations are deliberately slow (tunable cost) and CPU-bound.
 * Async callers should run them through `tokio::task::spawn_blocking`.
 */

use thiserror::Error;

/// Lowest cost bcrypt accepts
pub const MIN_COST: u32 = 4;

/// Highest cost bcrypt accepts
pub const MAX_COST: u32 = 31;

/// Longest password bcrypt digests without truncation
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Password hashing errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// The hashing subsystem failed (invalid cost, oversized input)
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// Password did not verify against the hash
    ///
    /// Wrong password and unreadable hash are deliberately indistinguishable.
    #[error("Password verification failed")]
    Verification,
}

/// bcrypt hasher with a fixed work factor
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl PasswordHasher {
    /// Create a hasher with the given bcrypt cost
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::Hashing` if `cost` is outside `4..=31`.
    pub fn new(cost: u32) -> Result<Self, PasswordError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(PasswordError::Hashing(format!(
                "bcrypt cost {} outside {}..={}",
                cost, MIN_COST, MAX_COST
            )));
        }
        Ok(Self { cost })
    }

    /// Work factor in use
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password
    ///
    /// Passwords longer than bcrypt's 72-byte input are rejected rather than
    /// silently truncated.
    ///
    /// # Returns
    ///
    /// A `$2b$` modular-crypt string containing cost, salt and digest
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordError::Hashing(format!(
                "password is {} bytes, limit is {}",
                plaintext.len(),
                MAX_PASSWORD_BYTES
            )));
        }

        bcrypt::hash(plaintext, self.cost).map_err(|e| PasswordError::Hashing(e.to_string()))
    }

    /// Verify a plaintext password against a stored hash
    ///
    /// The digest comparison inside bcrypt is constant-time. Any failure,
    /// including a malformed hash or an over-long password, is reported as
    /// `Verification`.
    pub fn verify(&self, plaintext: &str, hashed: &str) -> Result<(), PasswordError> {
        // bcrypt::verify would truncate, matching a 73-byte input to its 72-byte prefix
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordError::Verification);
        }

        match bcrypt::verify(plaintext, hashed) {
            Ok(true) => Ok(()),
            Ok(false) => Err(PasswordError::Verification),
            Err(e) => {
                tracing::debug!("bcrypt verification error: {}", e);
                Err(PasswordError::Verification)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::new(MIN_COST).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = fast_hasher();
        let hashed = hasher.hash("04234").unwrap();

        assert_ne!(hashed, "04234");
        assert!(hashed.starts_with("$2"));
        assert!(hasher.verify("04234", &hashed).is_ok());
    }

    #[test]
    fn test_wrong_password_fails() {
        let hasher = fast_hasher();
        let hashed = hasher.hash("correct horse").unwrap();

        assert_eq!(
            hasher.verify("battery staple", &hashed),
            Err(PasswordError::Verification)
        );
    }

    #[test]
    fn test_salt_differs_per_call() {
        let hasher = fast_hasher();
        let first = hasher.hash("same").unwrap();
        let second = hasher.hash("same").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("same", &first).is_ok());
        assert!(hasher.verify("same", &second).is_ok());
    }

    #[test]
    fn test_malformed_hash_is_generic_failure() {
        let hasher = fast_hasher();
        assert_eq!(
            hasher.verify("password", "not-a-bcrypt-hash"),
            Err(PasswordError::Verification)
        );
    }

    #[test]
    fn test_empty_password_round_trip() {
        let hasher = fast_hasher();
        let hashed = hasher.hash("").unwrap();
        assert!(hasher.verify("", &hashed).is_ok());
        assert!(hasher.verify(" ", &hashed).is_err());
    }

    #[test]
    fn test_password_at_byte_limit_round_trips() {
        let hasher = fast_hasher();
        let exact = "a".repeat(MAX_PASSWORD_BYTES);
        let hashed = hasher.hash(&exact).unwrap();

        assert!(hasher.verify(&exact, &hashed).is_ok());
        assert_eq!(
            hasher.verify(&"a".repeat(MAX_PASSWORD_BYTES - 1), &hashed),
            Err(PasswordError::Verification)
        );
    }

    #[test]
    fn test_oversized_password_rejected() {
        let hasher = fast_hasher();
        let long = "a".repeat(MAX_PASSWORD_BYTES + 1);
        assert_matches!(hasher.hash(&long), Err(PasswordError::Hashing(_)));

        // No silent truncation to the 72-byte prefix
        let prefix_hash = hasher.hash(&long[..MAX_PASSWORD_BYTES]).unwrap();
        assert_eq!(
            hasher.verify(&long, &prefix_hash),
            Err(PasswordError::Verification)
        );
    }

    #[test]
    fn test_limit_counts_bytes_not_chars() {
        let hasher = fast_hasher();
        // 36 two-byte chars fit; 37 do not
        assert!(hasher.hash(&"é".repeat(36)).is_ok());
        assert_matches!(hasher.hash(&"é".repeat(37)), Err(PasswordError::Hashing(_)));
    }

    #[test]
    fn test_cost_is_embedded() {
        let hasher = PasswordHasher::new(5).unwrap();
        let hashed = hasher.hash("pw").unwrap();
        assert!(hashed.contains("$05$"));
        assert_eq!(hasher.cost(), 5);
    }

    #[test]
    fn test_invalid_cost_rejected() {
        assert_matches!(PasswordHasher::new(3), Err(PasswordError::Hashing(_)));
        assert_matches!(PasswordHasher::new(32), Err(PasswordError::Hashing(_)));
    }
}
