//! Domain service for login and cookie-session identity.

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::db::{RepoError, User};

/// Errors specific to authentication operations.
///
/// Login failures are deliberately a single opaque variant: callers must
/// not be able to tell an unknown name from a wrong password.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid name and password")]
    InvalidCredentials,

    #[error("no authenticated session")]
    Unauthenticated,

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepoError> for AuthError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound | RepoError::InvalidId(_) => Self::InvalidCredentials,
            RepoError::Database(e) => Self::Storage(e.to_string()),
        }
    }
}

/// Successful login: the matched user plus the digest that matched it, so
/// the handler owning the response can stash both in the session.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub digest: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Hashes the plaintext and verifies the name/digest pair.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] on any verification miss.
    async fn login(&self, name: &str, password: &str) -> Result<LoginOutcome, AuthError>;

    /// Resolves a session-stored name back to a user record.
    async fn identify(&self, name: &str) -> Result<User, AuthError>;
}

/// Password digest: unsalted SHA-256, lowercase hex.
///
/// Deterministic on purpose: the stored digest is the lookup key for
/// credential verification.
#[must_use]
pub fn digest(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic() {
        assert_eq!(digest("secret"), digest("secret"));
    }

    #[test]
    fn digest_is_64_hex_chars() {
        let d = digest("anything at all");
        assert_eq!(d.len(), 64);
        assert!(d.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(d, d.to_lowercase());
    }

    #[test]
    fn digest_known_vector() {
        assert_eq!(
            digest("secret"),
            "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b"
        );
    }

    #[test]
    fn empty_input_is_total_and_distinct() {
        assert_eq!(digest("").len(), 64);
        assert_ne!(digest(""), digest("a"));
    }
}
