use anyhow::Result;
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Request, Response};
use shared::types::LoginData;
use std::convert::Infallible;
use tracing::{info, warn};

use crate::AppState;
use crate::handlers::http::utils::{deliver_auth_error, deliver_token, malformed, parse_json};

/// `POST /login` with `{name, password}`.
pub async fn handle_login(
    req: Request<Bytes>,
    state: AppState,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    info!("Processing login request");

    let data: LoginData = match parse_json(req.body()) {
        Ok(data) => data,
        Err(e) => {
            warn!("Login JSON parsing failed: {}", e.to_code());
            return deliver_auth_error(&e);
        }
    };

    if let Err(e) = data.validate() {
        warn!("Login validation failed: {}", e);
        return deliver_auth_error(&malformed(e));
    }

    match state.engine.login(&data.name, &data.password).await {
        Ok(token) => {
            info!("Login successful for: {}", data.name);
            deliver_token(token)
        }
        Err(e) => deliver_auth_error(&e),
    }
}
