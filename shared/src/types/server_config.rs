use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

/// Deployment environment; selects the log format and default level.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Dev,
    Prod,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Per-request deadline, seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Also bounds how long graceful shutdown waits for open connections.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// sqlx connection string, e.g. `sqlite://auth.db` or `sqlite::memory:`.
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    #[serde(default = "default_token_expiry")]
    pub token_expiry_minutes: u64,
    /// HMAC key used to sign and verify session tokens.
    ///
    /// Prefer the `JWT_SECRET` environment variable; this field is the
    /// fallback. Minimum length: 32 characters. Rotating it invalidates
    /// every outstanding token.
    pub jwt_secret: Option<String>,
    /// Deadline for a single credential store call, milliseconds.
    #[serde(default = "default_store_timeout")]
    pub store_timeout_ms: u64,
    /// Role assigned to accounts created through signup.
    #[serde(default = "default_role")]
    pub default_role: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub env: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

impl ServerConfig {
    /// Full bind address, e.g. `"0.0.0.0:8080"`
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

impl AuthConfig {
    pub fn token_expiry_secs(&self) -> Result<i64, ConfigError> {
        self.token_expiry_minutes
            .checked_mul(60)
            .and_then(|secs| i64::try_from(secs).ok())
            .ok_or_else(|| {
                ConfigError::InvalidConfig(format!(
                    "token_expiry_minutes {} is out of range",
                    self.token_expiry_minutes
                ))
            })
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Resolve the signing secret with `JWT_SECRET` taking priority over the
    /// config file field. `None` when neither is set.
    pub fn resolved_jwt_secret(&self) -> Option<String> {
        resolve_secret(std::env::var("JWT_SECRET").ok(), self.jwt_secret.clone())
    }
}

pub(crate) fn resolve_secret(from_env: Option<String>, from_file: Option<String>) -> Option<String> {
    from_env
        .filter(|s| !s.is_empty())
        .or(from_file)
        .filter(|s| !s.is_empty())
}

/// Longest session lifetime accepted from config: one year.
pub const MAX_TOKEN_EXPIRY_MINUTES: u64 = 365 * 24 * 60;

// ---------------------------------------------------------------------------
// Serde defaults
// ---------------------------------------------------------------------------

pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_port() -> u16 {
    8080
}

pub fn default_timeout() -> u64 {
    4
}

pub fn default_idle_timeout() -> u64 {
    60
}

pub fn default_max_connections() -> u32 {
    5
}

pub fn default_token_expiry() -> u64 {
    60
}

pub fn default_store_timeout() -> u64 {
    2000
}

pub fn default_role() -> String {
    "user".to_string()
}
