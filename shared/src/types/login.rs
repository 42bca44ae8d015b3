use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Request wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub name: String,
    pub password: String,
}

/// Body of `/auth`: a previously issued token plus the roles the caller's
/// route accepts.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizeData {
    pub refresh_token: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogoutData {
    pub refresh_token: String,
}

// ---------------------------------------------------------------------------
// Response wire types
// ---------------------------------------------------------------------------

/// Returned by signup, login and authorize on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub refresh_token: String,
}

impl TokenResponse {
    pub fn new(refresh_token: String) -> Self {
        Self { refresh_token }
    }
}

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// Why a decoded request body was still rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("missing required field: {0}")]
    Missing(&'static str),

    #[error("invalid email format")]
    InvalidEmail,
}

pub(crate) fn require(field: &'static str, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::Missing(field));
    }
    Ok(())
}

impl LoginData {
    pub fn validate(&self) -> Result<(), FieldError> {
        require("name", &self.name)?;
        require("password", &self.password)
    }
}

impl AuthorizeData {
    /// An empty role list is allowed; it simply authorizes nobody.
    pub fn validate(&self) -> Result<(), FieldError> {
        require("refresh_token", &self.refresh_token)
    }
}

impl LogoutData {
    pub fn validate(&self) -> Result<(), FieldError> {
        require("refresh_token", &self.refresh_token)
    }
}
