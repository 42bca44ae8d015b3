use std::fmt;

use serde::{Deserialize, Serialize};

/// Claims embedded in every session token issued by the server.
///
/// A token is self-contained: signature and expiry can be checked without
/// touching the store. It is only *authorized* once the store confirms the
/// user's login flag is still set, so logging out revokes every token a
/// user holds without keeping a blocklist.
///
/// Wire names are the short claim keys existing clients read.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Opaque user id (matches `users.id`).
    #[serde(rename = "id")]
    pub user_id: String,

    #[serde(rename = "username")]
    pub user_name: String,

    pub role: String,

    /// Stored password verifier (the hash, never the plaintext). Carried so
    /// re-authorization can re-check identity in already-hashed mode.
    #[serde(rename = "password")]
    pub password_verifier: String,

    /// Expiry (Unix timestamp, seconds).
    #[serde(rename = "exp")]
    pub expires_at: i64,

    /// Issued-at (Unix timestamp, seconds).
    #[serde(rename = "iat")]
    pub issued_at: i64,

    /// Random token id; two tokens minted in the same second still differ.
    pub jti: String,
}

impl fmt::Debug for SessionClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClaims")
            .field("user_id", &self.user_id)
            .field("user_name", &self.user_name)
            .field("role", &self.role)
            .field("password_verifier", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("issued_at", &self.issued_at)
            .field("jti", &self.jti)
            .finish()
    }
}

impl SessionClaims {
    /// True once `now` has reached `expires_at`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at <= now
    }
}
