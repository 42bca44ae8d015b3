use anyhow::Result;
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Request, Response};
use shared::types::AuthorizeData;
use std::convert::Infallible;
use tracing::{debug, warn};

use crate::AppState;
use crate::handlers::http::utils::{deliver_auth_error, deliver_token, malformed, parse_json};

/// `POST /auth` with `{refresh_token, roles}`. Success renews the token.
pub async fn handle_authorize(
    req: Request<Bytes>,
    state: AppState,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    let data: AuthorizeData = match parse_json(req.body()) {
        Ok(data) => data,
        Err(e) => return deliver_auth_error(&e),
    };

    if let Err(e) = data.validate() {
        warn!("Authorize validation failed: {}", e);
        return deliver_auth_error(&malformed(e));
    }

    debug!("Authorizing against roles {:?}", data.roles);

    match state
        .engine
        .authorize(&data.refresh_token, &data.roles)
        .await
    {
        Ok(token) => deliver_token(token),
        Err(e) => deliver_auth_error(&e),
    }
}
