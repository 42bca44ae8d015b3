use http::StatusCode;
use shared::types::ErrorResponse;
use thiserror::Error;

/// Every way an auth operation can fail.
///
/// The `Display` text is for logs. What a client sees comes from
/// [`AuthError::to_message`], which is deliberately coarse: the absent-user
/// and wrong-password cases share one message, and every token problem reads
/// as "token expired".
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("authentication failed")]
    AuthenticationFailure,

    #[error("token invalid: {0}")]
    TokenInvalid(String),

    #[error("token expired")]
    TokenExpired,

    #[error("session revoked")]
    RevokedSession,

    /// Re-verification of a token's identity against the store failed.
    #[error("identity could not be verified")]
    IdentityUnverified,

    #[error("forbidden")]
    Forbidden,

    #[error("user already exists")]
    UserExists,

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedInput(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationFailure
            | Self::TokenInvalid(_)
            | Self::TokenExpired
            | Self::RevokedSession => StatusCode::UNAUTHORIZED,
            Self::IdentityUnverified | Self::UserExists => StatusCode::CONFLICT,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::StoreUnavailable(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_code(&self) -> &'static str {
        match self {
            Self::MalformedInput(_) => "INVALID_REQUEST",
            Self::AuthenticationFailure => "WRONG_CREDENTIALS",
            Self::TokenInvalid(_) | Self::TokenExpired | Self::RevokedSession => "TOKEN_EXPIRED",
            Self::IdentityUnverified => "CONFLICT",
            Self::Forbidden => "FORBIDDEN",
            Self::UserExists => "USER_EXISTS",
            Self::StoreUnavailable(_) | Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_message(&self) -> &'static str {
        match self {
            Self::MalformedInput(_) => "invalid request",
            Self::AuthenticationFailure => "wrong creds",
            Self::TokenInvalid(_) | Self::TokenExpired | Self::RevokedSession => "token expired",
            Self::IdentityUnverified => "something went wrong",
            Self::Forbidden => "forbidden",
            Self::UserExists => "user already exists",
            Self::StoreUnavailable(_) | Self::Internal(_) => "internal error",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.status().as_u16(), self.to_code(), self.to_message())
    }
}
