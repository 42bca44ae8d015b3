use anyhow::{Context, Result, anyhow};
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Response, StatusCode, header};
use serde::Serialize;
use shared::types::{ErrorResponse, TokenResponse};
use std::convert::Infallible;
use tracing::{debug, warn};

use super::body::{empty, full};
use crate::auth::AuthError;

/// Serialize any `Serialize` type and deliver it as a JSON response.
pub fn deliver_serialized_json<T: Serialize>(
    data: &T,
    status: StatusCode,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    let json = serde_json::to_string(data).context("Failed to serialize response")?;

    debug!("Delivering serialized JSON response, size: {} bytes", json.len());

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(full(json))
        .map_err(|e| anyhow!("Failed to build JSON response: {}", e))
}

/// Delivers a JSON error response with the specified error code, message, and status.
pub fn deliver_error_json(
    error_code: &str,
    message: &str,
    status: StatusCode,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    warn!(
        "Delivering error JSON: {} - {} ({})",
        status.as_u16(),
        error_code,
        message
    );

    deliver_serialized_json(
        &ErrorResponse::new(status.as_u16(), error_code, message),
        status,
    )
}

/// The public face of an engine failure: fixed status, code and message.
pub fn deliver_auth_error(err: &AuthError) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    deliver_error_json(err.to_code(), err.to_message(), err.status())
}

pub fn deliver_token(token: String) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    deliver_serialized_json(&TokenResponse::new(token), StatusCode::OK)
}

pub fn deliver_no_content() -> Result<Response<BoxBody<Bytes, Infallible>>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .body(empty())
        .context("Failed to build 204 response")
}

/// Last-resort 500 that cannot itself fail.
pub fn internal_error() -> Response<BoxBody<Bytes, Infallible>> {
    let body = r#"{"status":500,"code":"INTERNAL_ERROR","message":"internal error"}"#;
    let mut res = Response::new(full(body));
    *res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    res.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    res
}
