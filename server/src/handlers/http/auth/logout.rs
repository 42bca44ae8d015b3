use anyhow::Result;
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Request, Response};
use shared::types::LogoutData;
use std::convert::Infallible;
use tracing::{info, warn};

use crate::AppState;
use crate::handlers::http::utils::{deliver_auth_error, deliver_no_content, malformed, parse_json};

/// `POST /logout` with `{refresh_token}`. Answers 204 with no body.
pub async fn handle_logout(
    req: Request<Bytes>,
    state: AppState,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    info!("Processing logout request");

    let data: LogoutData = match parse_json(req.body()) {
        Ok(data) => data,
        Err(e) => return deliver_auth_error(&e),
    };

    if let Err(e) = data.validate() {
        warn!("Logout validation failed: {}", e);
        return deliver_auth_error(&malformed(e));
    }

    match state.engine.logout(&data.refresh_token).await {
        Ok(()) => deliver_no_content(),
        Err(e) => deliver_auth_error(&e),
    }
}
