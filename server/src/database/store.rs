//! The credential store seam.
//!
//! The authorization engine only talks to persistence through
//! [`CredentialStore`]. Implementations must make flag reads and writes for
//! one user linearizable; the engine holds no state of its own.

use std::time::Duration;

use async_trait::async_trait;
use shared::types::User;
use thiserror::Error;

/// How `lookup_by_credential` compares the presented secret. A verifier is
/// never accepted where a plaintext password is expected, nor the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialMode {
    /// A user-typed password: hash it and check against the stored verifier.
    Plaintext,
    /// A verifier previously handed out inside a token: compare as-is.
    Verifier,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// No such user, or the credential did not match. Never split these.
    #[error("not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("store call timed out after {0:?}")]
    Timeout(Duration),
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn lookup_by_credential(
        &self,
        name: &str,
        secret: &str,
        mode: CredentialMode,
    ) -> Result<User, StoreError>;

    /// Create a user and mark it logged in, atomically.
    async fn create(&self, name: &str, password: &str, email: &str) -> Result<User, StoreError>;

    async fn get_login_flag(&self, user_id: &str) -> Result<bool, StoreError>;

    async fn set_login_flag(&self, user_id: &str, value: bool) -> Result<(), StoreError>;
}
