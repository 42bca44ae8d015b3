use serde::Deserialize;

use super::login::{FieldError, require};

#[derive(Debug, Clone, Deserialize)]
pub struct SignupData {
    pub name: String,
    pub password: String,
    pub email: String,
}

impl SignupData {
    pub fn validate(&self) -> Result<(), FieldError> {
        require("name", &self.name)?;
        require("password", &self.password)?;
        require("email", &self.email)?;

        if !is_valid_email(&self.email) {
            return Err(FieldError::InvalidEmail);
        }

        Ok(())
    }
}

/// Basic shape check: one `@`, something on both sides, a dot in the domain.
pub fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
