pub mod auth;
pub mod routes;
pub mod utils;

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::body::Body;
use hyper::{Request, Response, StatusCode};
use tokio::time;
use tracing::{error, warn};

use crate::AppState;
use routes::Router;
use utils::{BodyError, collect_body, deliver_error_json, internal_error};

type ServiceResponse = Response<BoxBody<Bytes, Infallible>>;

/// Per-request entry point handed to hyper's `service_fn`.
///
/// Buffers the body (capped), routes it, and bounds the whole exchange by
/// `deadline`. Never fails: handler errors are logged and become a 500.
pub async fn serve_request<B>(
    req: Request<B>,
    router: Arc<Router>,
    state: AppState,
    deadline: Duration,
) -> Result<ServiceResponse, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let exchange = async move {
        let (parts, body) = req.into_parts();
        let bytes = match collect_body(body).await {
            Ok(bytes) => bytes,
            Err(BodyError::TooLarge) => {
                return deliver_error_json(
                    "PAYLOAD_TOO_LARGE",
                    "request body too large",
                    StatusCode::PAYLOAD_TOO_LARGE,
                );
            }
            Err(BodyError::Read(e)) => {
                warn!("Failed to read request body: {}", e);
                return deliver_error_json(
                    "INVALID_REQUEST",
                    "invalid request",
                    StatusCode::BAD_REQUEST,
                );
            }
        };
        router.route(Request::from_parts(parts, bytes), state).await
    };

    let response = match time::timeout(deadline, exchange).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            error!("{} {} failed: {:#}", method, path, e);
            internal_error()
        }
        Err(_) => {
            warn!("{} {} timed out after {:?}", method, path, deadline);
            deliver_error_json(
                "REQUEST_TIMEOUT",
                "request timed out",
                StatusCode::REQUEST_TIMEOUT,
            )
            .unwrap_or_else(|_| internal_error())
        }
    };

    Ok(response)
}
