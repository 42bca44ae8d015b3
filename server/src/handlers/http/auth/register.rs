use anyhow::Result;
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Request, Response};
use shared::types::SignupData;
use std::convert::Infallible;
use tracing::{info, warn};

use crate::AppState;
use crate::handlers::http::utils::{deliver_auth_error, deliver_token, malformed, parse_json};

/// `POST /signup` with `{name, password, email}`.
pub async fn handle_signup(
    req: Request<Bytes>,
    state: AppState,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    info!("Processing signup request");

    let data: SignupData = match parse_json(req.body()) {
        Ok(data) => data,
        Err(e) => return deliver_auth_error(&e),
    };

    if let Err(e) = data.validate() {
        warn!("Signup validation failed: {}", e);
        return deliver_auth_error(&malformed(e));
    }

    match state
        .engine
        .signup(&data.name, &data.password, &data.email)
        .await
    {
        Ok(token) => deliver_token(token),
        Err(e) => deliver_auth_error(&e),
    }
}
