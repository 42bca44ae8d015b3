//! Session token codec: sign claims into a JWT, verify and decode them back.
//!
//! Expiry is *not* enforced here. [`TokenCodec::decode`] accepts an expired
//! but otherwise valid token so the engine applies the expiry policy in one
//! place.

use std::collections::HashSet;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use shared::types::{SessionClaims, User};
use thiserror::Error;

use crate::database::utils::{generate_uuid, get_timestamp};

/// Default token lifetime, seconds.
pub const DEFAULT_EXPIRY_SECS: i64 = 60 * 60;

/// Algorithms accepted on decode. Anything outside the HMAC family,
/// including "none", is rejected before the signature is looked at.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Malformed, tampered, wrongly signed or missing claims.
    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("token signing failed: {0}")]
    Signing(String),
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry_secs: i64,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("expiry_secs", &self.expiry_secs)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Build a codec around an HMAC secret. A negative `expiry_secs` mints
    /// tokens that are already expired, which tests rely on.
    pub fn new(secret: &[u8], expiry_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.validate_exp = false;
        validation.leeway = 0;
        // Required fields are enforced by deserializing into SessionClaims.
        validation.required_spec_claims = HashSet::new();

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            expiry_secs,
        }
    }

    /// Sign a fresh token for `user`, expiring one window from now.
    pub fn generate(&self, user: &User) -> Result<String, TokenError> {
        self.generate_at(user, get_timestamp())
    }

    /// Sign a token as if issued at `now` (Unix seconds).
    pub fn generate_at(&self, user: &User, now: i64) -> Result<String, TokenError> {
        let expires_at = now
            .checked_add(self.expiry_secs)
            .ok_or_else(|| TokenError::Signing("token expiry overflows".into()))?;

        let claims = SessionClaims {
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            role: user.role.clone(),
            password_verifier: user.password.clone(),
            expires_at,
            issued_at: now,
            jti: generate_uuid(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify the algorithm and signature and extract the claims.
    pub fn decode(&self, token: &str) -> Result<SessionClaims, TokenError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::Invalid(e.to_string()))
    }
}
