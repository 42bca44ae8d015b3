use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;

use anyhow::{Context, Result};
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Method, Request, Response, StatusCode};
use tracing::debug;

use crate::AppState;
use crate::handlers::http::auth;
use crate::handlers::http::utils::*;

// ---------------------------------------------------------------------------
// Handler type
// ---------------------------------------------------------------------------
//
// Bodies are buffered before routing, so handlers receive `Request<Bytes>`.
// Auth lives in the request body (the token is a field, not a header), so
// every route is open at the routing level and the engine does the checks.

type RouteHandler = Box<
    dyn Fn(
            Request<Bytes>,
            AppState,
        )
            -> Pin<Box<dyn Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send>>
        + Send
        + Sync,
>;

struct Route {
    method: Method,
    path: String,
    handler: RouteHandler,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub struct Router {
    routes: Vec<Route>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes_count", &self.routes.len())
            .finish()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn get<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<Bytes>, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send + 'static,
    {
        self.add(Method::GET, path, handler)
    }

    pub fn post<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<Bytes>, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send + 'static,
    {
        self.add(Method::POST, path, handler)
    }

    fn add<F, Fut>(mut self, method: Method, path: &str, handler: F) -> Self
    where
        F: Fn(Request<Bytes>, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send + 'static,
    {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            handler: Box::new(move |req, state| Box::pin(handler(req, state))),
        });
        self
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    pub async fn route(
        &self,
        req: Request<Bytes>,
        state: AppState,
    ) -> Result<Response<BoxBody<Bytes, Infallible>>> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let mut path_known = false;

        for route in &self.routes {
            if !Self::path_matches(&route.path, &path) {
                continue;
            }
            path_known = true;
            if route.method == method {
                debug!("Dispatching {} {}", method, path);
                return (route.handler)(req, state).await;
            }
        }

        if path_known {
            return deliver_error_json(
                "METHOD_NOT_ALLOWED",
                "Method not allowed",
                StatusCode::METHOD_NOT_ALLOWED,
            )
            .context("Failed to deliver 405 response");
        }

        deliver_error_json("NOT_FOUND", "Endpoint not found", StatusCode::NOT_FOUND)
            .context("Failed to deliver 404 response")
    }

    // ── Path matching ─────────────────────────────────────────────────────────

    pub fn path_matches(route_path: &str, request_path: &str) -> bool {
        // Strip query string from incoming request path before comparing.
        let clean = request_path.split('?').next().unwrap_or(request_path);
        route_path == clean
    }
}

// ---------------------------------------------------------------------------
// Service routes
// ---------------------------------------------------------------------------

pub fn build_router() -> Router {
    Router::new()
        .get("/health", |_req, _state| async move {
            deliver_serialized_json(
                &serde_json::json!({ "status": "success", "health": "ok" }),
                StatusCode::OK,
            )
        })
        .post("/signup", |req, state| async move {
            auth::handle_signup(req, state)
                .await
                .context("Signup failed")
        })
        .post("/login", |req, state| async move {
            auth::handle_login(req, state).await.context("Login failed")
        })
        .post("/auth", |req, state| async move {
            auth::handle_authorize(req, state)
                .await
                .context("Authorize failed")
        })
        .post("/logout", |req, state| async move {
            auth::handle_logout(req, state)
                .await
                .context("Logout failed")
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
