pub mod auth;
pub mod database;
pub mod handlers;
pub mod logging;

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use shared::types::AppConfig;

use auth::{AuthEngine, TokenCodec};
use database::SqliteStore;

/// Shared per-request state. Cloning is an `Arc` bump.
#[derive(Clone, Debug)]
pub struct AppState {
    pub engine: Arc<AuthEngine>,
}

impl AppState {
    pub fn new(engine: AuthEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

/// Open the store and assemble the engine described by `config`.
pub async fn build_state(config: &AppConfig) -> Result<AppState> {
    let secret = config
        .auth
        .resolved_jwt_secret()
        .ok_or_else(|| anyhow!("No signing secret: set JWT_SECRET or auth.jwt_secret"))?;

    let store = SqliteStore::connect(
        &config.database.url,
        config.database.max_connections,
        &config.auth.default_role,
    )
    .await
    .with_context(|| format!("Failed to open database {}", config.database.url))?;

    let expiry_secs = config
        .auth
        .token_expiry_secs()
        .context("Invalid token lifetime")?;
    let codec = TokenCodec::new(secret.as_bytes(), expiry_secs);
    let engine = AuthEngine::new(Arc::new(store), codec, config.auth.store_timeout());

    Ok(AppState::new(engine))
}
