//! The authorization engine: signup, login, authorize and logout.
//!
//! Per user the state machine is `loggedOut <-> loggedIn`, held entirely in
//! the store's login flag. Signup and login set it, logout clears it and
//! authorize only reads it. A token is honoured only while its signature
//! verifies, its expiry lies ahead and the flag is set.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use shared::types::{SessionClaims, User};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use super::error::AuthError;
use super::token::TokenCodec;
use crate::database::utils::get_timestamp;
use crate::database::{CredentialMode, CredentialStore, StoreError};

/// Stateless orchestrator over a credential store and a token codec.
/// Cheap to share: wrap in `Arc` and hand a clone to every request.
pub struct AuthEngine {
    store: Arc<dyn CredentialStore>,
    codec: TokenCodec,
    store_timeout: Duration,
}

impl std::fmt::Debug for AuthEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthEngine")
            .field("codec", &self.codec)
            .field("store_timeout", &self.store_timeout)
            .finish_non_exhaustive()
    }
}

impl AuthEngine {
    pub fn new(store: Arc<dyn CredentialStore>, codec: TokenCodec, store_timeout: Duration) -> Self {
        Self {
            store,
            codec,
            store_timeout,
        }
    }

    /// Create an account (logged in) and return its first token.
    pub async fn signup(&self, name: &str, password: &str, email: &str) -> Result<String, AuthError> {
        let user = self
            .bounded(self.store.create(name, password, email))
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => {
                    warn!("Signup rejected, name taken: {}", name);
                    AuthError::UserExists
                }
                other => {
                    error!("Signup failed for {}: {}", name, other);
                    AuthError::StoreUnavailable(other.to_string())
                }
            })?;

        info!("User signed up: {}", user);
        self.issue(&user)
    }

    /// Check a name/password pair, set the login flag and return a token.
    ///
    /// Absent user, wrong password and a failed lookup all produce the same
    /// `AuthenticationFailure`.
    pub async fn login(&self, name: &str, password: &str) -> Result<String, AuthError> {
        let user = self
            .bounded(
                self.store
                    .lookup_by_credential(name, password, CredentialMode::Plaintext),
            )
            .await
            .map_err(|e| {
                warn!("Login failed for {}: {}", name, e);
                AuthError::AuthenticationFailure
            })?;

        self.bounded(self.store.set_login_flag(&user.id, true))
            .await
            .map_err(|e| {
                error!("Failed to set login flag for {}: {}", user.id, e);
                AuthError::StoreUnavailable(e.to_string())
            })?;

        info!("User logged in: {} (ID: {})", user.name, user.id);
        self.issue(&user)
    }

    /// Validate `token`, confirm the session is live and the user's role is
    /// one of `required_roles`, then hand back a renewed token.
    ///
    /// Check order matters: signature and expiry, then identity and login
    /// flag, and only then the role. A dead session can never surface as
    /// `Forbidden`.
    pub async fn authorize(
        &self,
        token: &str,
        required_roles: &[String],
    ) -> Result<String, AuthError> {
        let claims = self.verify_token(token)?;

        let user = self
            .bounded(self.store.lookup_by_credential(
                &claims.user_name,
                &claims.password_verifier,
                CredentialMode::Verifier,
            ))
            .await
            .map_err(|e| {
                warn!("Re-verification failed for {}: {}", claims.user_name, e);
                AuthError::IdentityUnverified
            })?;

        if user.id != claims.user_id {
            warn!(
                "Token user id {} does not match stored id {} for {}",
                claims.user_id, user.id, user.name
            );
            return Err(AuthError::IdentityUnverified);
        }

        if !user.is_logged_in {
            debug!("Session revoked for {}", user.name);
            return Err(AuthError::RevokedSession);
        }

        if !required_roles.iter().any(|r| r == &user.role) {
            warn!(
                "Forbidden: {} has role {}, needs one of {:?}",
                user.name, user.role, required_roles
            );
            return Err(AuthError::Forbidden);
        }

        debug!("Authorized {} as {}", user.name, user.role);
        self.issue(&user)
    }

    /// Clear the login flag for the token's user, revoking all of that
    /// user's tokens at once.
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let claims = self.verify_token(token)?;

        self.bounded(self.store.set_login_flag(&claims.user_id, false))
            .await
            .map_err(|e| match e {
                StoreError::NotFound => {
                    warn!("Logout for unknown user id {}", claims.user_id);
                    AuthError::RevokedSession
                }
                other => {
                    error!("Failed to clear login flag for {}: {}", claims.user_id, other);
                    AuthError::StoreUnavailable(other.to_string())
                }
            })?;

        info!("User logged out: {} (ID: {})", claims.user_name, claims.user_id);
        Ok(())
    }

    /// Signature, algorithm and expiry only. No store access.
    pub fn verify_token(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let claims = self.codec.decode(token).map_err(|e| {
            debug!("Rejected token: {}", e);
            AuthError::TokenInvalid(e.to_string())
        })?;

        if claims.is_expired_at(get_timestamp()) {
            debug!("Expired token for {}", claims.user_name);
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }

    fn issue(&self, user: &User) -> Result<String, AuthError> {
        self.codec.generate(user).map_err(|e| {
            error!("Failed to sign token for {}: {}", user.id, e);
            AuthError::Internal(e.to_string())
        })
    }

    /// Run one store call under the configured deadline.
    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        match timeout(self.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Store call timed out after {:?}", self.store_timeout);
                Err(StoreError::Timeout(self.store_timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::auth::token::DEFAULT_EXPIRY_SECS;
    use crate::database::SqliteStore;

    const SECRET: &[u8] = b"engine-test-secret-0123456789abcdef";

    /// Wraps a real store and injects faults.
    struct FaultyStore {
        inner: SqliteStore,
        lookup_delay: Option<Duration>,
        fail_set_flag: bool,
        lookups: AtomicUsize,
        flag_writes: AtomicUsize,
    }

    impl FaultyStore {
        async fn new() -> Self {
            Self {
                inner: SqliteStore::connect("sqlite::memory:", 1, "user")
                    .await
                    .unwrap(),
                lookup_delay: None,
                fail_set_flag: false,
                lookups: AtomicUsize::new(0),
                flag_writes: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CredentialStore for FaultyStore {
        async fn lookup_by_credential(
            &self,
            name: &str,
            secret: &str,
            mode: CredentialMode,
        ) -> Result<User, StoreError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.lookup_delay {
                tokio::time::sleep(delay).await;
            }
            self.inner.lookup_by_credential(name, secret, mode).await
        }

        async fn create(&self, name: &str, password: &str, email: &str) -> Result<User, StoreError> {
            self.inner.create(name, password, email).await
        }

        async fn get_login_flag(&self, user_id: &str) -> Result<bool, StoreError> {
            self.inner.get_login_flag(user_id).await
        }

        async fn set_login_flag(&self, user_id: &str, value: bool) -> Result<(), StoreError> {
            self.flag_writes.fetch_add(1, Ordering::SeqCst);
            if self.fail_set_flag {
                return Err(StoreError::Hashing("injected failure".into()));
            }
            self.inner.set_login_flag(user_id, value).await
        }
    }

    fn engine(store: Arc<FaultyStore>, expiry_secs: i64) -> AuthEngine {
        AuthEngine::new(
            store,
            TokenCodec::new(SECRET, expiry_secs),
            Duration::from_millis(1500),
        )
    }

    fn roles(r: &[&str]) -> Vec<String> {
        r.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn login_flag_failure_issues_no_token() {
        let mut store = FaultyStore::new().await;
        store.fail_set_flag = true;
        let store = Arc::new(store);
        let engine = engine(store.clone(), DEFAULT_EXPIRY_SECS);

        engine.signup("alice", "p1", "a@x.com").await.unwrap();
        let err = engine.login("alice", "p1").await.unwrap_err();

        assert!(matches!(err, AuthError::StoreUnavailable(_)));
        assert_eq!(store.flag_writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn wrong_password_never_writes_the_flag() {
        let store = Arc::new(FaultyStore::new().await);
        let engine = engine(store.clone(), DEFAULT_EXPIRY_SECS);

        engine.signup("alice", "p1", "a@x.com").await.unwrap();
        for _ in 0..3 {
            assert_eq!(
                engine.login("alice", "bad").await.unwrap_err(),
                AuthError::AuthenticationFailure
            );
        }
        assert_eq!(store.flag_writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn slow_lookup_on_login_is_authentication_failure() {
        let mut store = FaultyStore::new().await;
        store.lookup_delay = Some(Duration::from_secs(5));
        let store = Arc::new(store);
        let engine = engine(store.clone(), DEFAULT_EXPIRY_SECS);

        engine.signup("alice", "p1", "a@x.com").await.unwrap();
        assert_eq!(
            engine.login("alice", "p1").await.unwrap_err(),
            AuthError::AuthenticationFailure
        );
        assert_eq!(store.flag_writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn slow_lookup_on_authorize_is_generic() {
        let mut store = FaultyStore::new().await;
        store.lookup_delay = Some(Duration::from_secs(5));
        let store = Arc::new(store);
        let engine = engine(store.clone(), DEFAULT_EXPIRY_SECS);

        let token = engine.signup("alice", "p1", "a@x.com").await.unwrap();
        assert_eq!(
            engine.authorize(&token, &roles(&["user"])).await.unwrap_err(),
            AuthError::IdentityUnverified
        );
    }

    #[tokio::test]
    async fn expired_token_never_reaches_the_store() {
        let store = Arc::new(FaultyStore::new().await);
        let engine = engine(store.clone(), -120);

        let token = engine.signup("alice", "p1", "a@x.com").await.unwrap();
        assert_eq!(
            engine.authorize(&token, &roles(&["user"])).await.unwrap_err(),
            AuthError::TokenExpired
        );
        assert_eq!(engine.logout(&token).await.unwrap_err(), AuthError::TokenExpired);

        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
        assert_eq!(store.flag_writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_token_never_reaches_the_store() {
        let store = Arc::new(FaultyStore::new().await);
        let engine = engine(store.clone(), DEFAULT_EXPIRY_SECS);

        let err = engine
            .authorize("not.a.token", &roles(&["user"]))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid(_)));
        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn logout_flag_failure_is_reported() {
        let mut store = FaultyStore::new().await;
        store.fail_set_flag = true;
        let store = Arc::new(store);
        let engine = engine(store.clone(), DEFAULT_EXPIRY_SECS);

        let token = engine.signup("alice", "p1", "a@x.com").await.unwrap();
        assert!(matches!(
            engine.logout(&token).await.unwrap_err(),
            AuthError::StoreUnavailable(_)
        ));
        // Session is still live since the write never happened.
        assert!(engine.authorize(&token, &roles(&["user"])).await.is_ok());
    }
}
