use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use shared::types::User;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{debug, info};

use super::create::create_tables;
use super::login as db_login;
use super::register::{NewUser, register_user};
use super::store::{CredentialMode, CredentialStore, StoreError};
use super::utils::{
    dummy_password_hash, generate_uuid, get_timestamp, hash_password, verifiers_match,
    verify_password,
};

/// [`CredentialStore`] backed by SQLite through sqlx.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    default_role: String,
    password_checks: Arc<AtomicU64>,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `url` and bootstrap the schema.
    ///
    /// An in-memory database lives only as long as its connection, so it is
    /// pinned to a single connection that never expires.
    pub async fn connect(
        url: &str,
        max_connections: u32,
        default_role: &str,
    ) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections)
        };

        let pool = pool_options.connect_with(options).await?;
        info!("Connected to database (in_memory={})", in_memory);

        Self::from_pool(pool, default_role).await
    }

    pub async fn from_pool(pool: SqlitePool, default_role: &str) -> Result<Self, sqlx::Error> {
        create_tables(&pool).await?;
        Ok(Self {
            pool,
            default_role: default_role.to_string(),
            password_checks: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Plaintext password verifications run so far, shared across clones.
    pub fn password_checks(&self) -> u64 {
        self.password_checks.load(Ordering::Relaxed)
    }
}

fn map_insert_error(e: sqlx::Error, name: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return StoreError::Conflict(format!("user {} already exists", name));
        }
    }
    StoreError::Database(e)
}

#[async_trait]
impl CredentialStore for SqliteStore {
    async fn lookup_by_credential(
        &self,
        name: &str,
        secret: &str,
        mode: CredentialMode,
    ) -> Result<User, StoreError> {
        let row = db_login::get_user_by_name(&self.pool, name).await?;

        let matches = match mode {
            CredentialMode::Plaintext => {
                // An absent user still pays for one argon2 verify.
                let hash = row
                    .as_ref()
                    .map(|r| r.password.clone())
                    .unwrap_or_else(|| dummy_password_hash().to_string());
                let password = secret.to_string();
                self.password_checks.fetch_add(1, Ordering::Relaxed);
                let verified = tokio::task::spawn_blocking(move || verify_password(&hash, &password))
                    .await
                    .map_err(|e| StoreError::Hashing(e.to_string()))?
                    .map_err(|e| StoreError::Hashing(e.to_string()))?;
                verified && row.is_some()
            }
            CredentialMode::Verifier => row
                .as_ref()
                .is_some_and(|r| verifiers_match(&r.password, secret)),
        };

        let row = match row {
            Some(row) if matches => row,
            _ => {
                debug!("Credential mismatch for {} ({:?})", name, mode);
                return Err(StoreError::NotFound);
            }
        };

        Ok(row.into())
    }

    async fn create(&self, name: &str, password: &str, email: &str) -> Result<User, StoreError> {
        let plaintext = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&plaintext))
            .await
            .map_err(|e| StoreError::Hashing(e.to_string()))?
            .map_err(|e| StoreError::Hashing(e.to_string()))?;

        let new_user = NewUser {
            id: generate_uuid(),
            name: name.to_string(),
            password_hash,
            email: email.to_string(),
            role: self.default_role.clone(),
            created_at: get_timestamp(),
        };

        register_user(&self.pool, &new_user)
            .await
            .map_err(|e| map_insert_error(e, name))?;

        Ok(User {
            id: new_user.id,
            name: new_user.name,
            password: new_user.password_hash,
            role: new_user.role,
            is_logged_in: true,
        })
    }

    async fn get_login_flag(&self, user_id: &str) -> Result<bool, StoreError> {
        db_login::get_login_flag(&self.pool, user_id)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn set_login_flag(&self, user_id: &str, value: bool) -> Result<(), StoreError> {
        match db_login::set_login_flag(&self.pool, user_id, value).await? {
            0 => Err(StoreError::NotFound),
            _ => Ok(()),
        }
    }
}
