use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::types::server_config::{AppConfig, ConfigError, MAX_TOKEN_EXPIRY_MINUTES};

/// Pick the config file: an explicit path wins, then `CONFIG_PATH`.
/// The file has to exist.
pub fn resolve_config_path(
    explicit: Option<&Path>,
    from_env: Option<String>,
) -> Result<PathBuf, ConfigError> {
    let path = match explicit {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => match from_env.filter(|s| !s.is_empty()) {
            Some(p) => PathBuf::from(p),
            None => {
                return Err(ConfigError::NotFound(
                    "CONFIG_PATH env variable is not set".into(),
                ));
            }
        },
    };

    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }

    Ok(path)
}

pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    info!("Loading configuration from: {}", path.display());

    let contents = fs::read_to_string(path)?;

    if contents.trim().is_empty() {
        error!("Configuration file is empty");
        return Err(ConfigError::InvalidConfig("empty file".into()));
    }

    let config = parse_config(&contents)?;

    info!("Configuration loaded successfully");
    Ok(config)
}

/// Parse and validate a TOML document.
pub fn parse_config(contents: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(contents)?;
    debug!(
        "Config: env={:?}, addr={}, database={}",
        config.env,
        config.server.addr(),
        config.database.url
    );

    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.database.url.trim().is_empty() {
        return Err(ConfigError::InvalidConfig(
            "database.url cannot be empty".into(),
        ));
    }

    if config.database.max_connections == 0 {
        return Err(ConfigError::InvalidConfig(
            "database.max_connections must be greater than 0".into(),
        ));
    }

    if config.auth.token_expiry_minutes == 0 {
        return Err(ConfigError::InvalidConfig(
            "token_expiry_minutes must be greater than 0".into(),
        ));
    }

    if config.auth.token_expiry_minutes > MAX_TOKEN_EXPIRY_MINUTES {
        return Err(ConfigError::InvalidConfig(format!(
            "token_expiry_minutes cannot exceed {}",
            MAX_TOKEN_EXPIRY_MINUTES
        )));
    }

    if config.auth.store_timeout_ms == 0 {
        return Err(ConfigError::InvalidConfig(
            "store_timeout_ms must be greater than 0".into(),
        ));
    }

    if config.auth.default_role.trim().is_empty() {
        return Err(ConfigError::InvalidConfig(
            "default_role cannot be empty".into(),
        ));
    }

    match config.auth.resolved_jwt_secret() {
        None => {
            return Err(ConfigError::InvalidConfig(
                "jwt_secret must be set via the JWT_SECRET env var or auth.jwt_secret config field"
                    .into(),
            ));
        }
        Some(secret) if secret.len() < 32 => {
            return Err(ConfigError::InvalidConfig(
                "jwt_secret must be at least 32 characters long".into(),
            ));
        }
        _ => {}
    }

    Ok(())
}
