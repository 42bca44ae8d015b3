use std::convert::Infallible;

use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty, Full, Limited};
use hyper::body::Body;
use serde::de::DeserializeOwned;
use shared::types::FieldError;
use tracing::debug;

use crate::auth::AuthError;

/// Request bodies above this are refused before parsing.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn empty() -> BoxBody<Bytes, Infallible> {
    Empty::<Bytes>::new().boxed()
}

pub fn full<T: Into<Bytes>>(chunk: T) -> BoxBody<Bytes, Infallible> {
    Full::new(chunk.into()).boxed()
}

/// Why a body could not be read off the wire.
#[derive(Debug, PartialEq, Eq)]
pub enum BodyError {
    TooLarge,
    Read(String),
}

/// Buffer a request body, capped at [`MAX_BODY_BYTES`].
pub async fn collect_body<B>(body: B) -> Result<Bytes, BodyError>
where
    B: Body<Data = Bytes>,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    match Limited::new(body, MAX_BODY_BYTES).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<http_body_util::LengthLimitError>() => Err(BodyError::TooLarge),
        Err(e) => Err(BodyError::Read(e.to_string())),
    }
}

/// Decode a JSON body. Any decode problem is `MalformedInput`; the store is
/// never consulted for a body that does not parse.
pub fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, AuthError> {
    serde_json::from_slice(body).map_err(|e| {
        debug!("Unparsable body: {}", e);
        AuthError::MalformedInput(e.to_string())
    })
}

pub fn malformed(err: FieldError) -> AuthError {
    AuthError::MalformedInput(err.to_string())
}
