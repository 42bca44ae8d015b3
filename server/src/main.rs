use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use auth_server::handlers::http::routes::build_router;
use auth_server::handlers::http::serve_request;
use auth_server::{build_state, logging};
use shared::config::{load_config, resolve_config_path};

/// Session token issuing and validation service.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to the TOML config file.
    #[arg(env = "CONFIG_PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // clap has already folded `CONFIG_PATH` into `args.config`.
    let config = match resolve_config_path(args.config.as_deref(), None)
        .and_then(|path| load_config(&path))
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    logging::init_logging(config.env);
    info!("Starting auth server (env: {:?})", config.env);

    if let Err(e) = run(config).await {
        error!("Server stopped with error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: shared::types::AppConfig) -> Result<()> {
    let state = build_state(&config).await?;
    let router = Arc::new(build_router());
    let request_timeout = config.server.timeout();

    let addr = config.server.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);

    let graceful = GracefulShutdown::new();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!("Failed to accept connection: {}", e);
                        continue;
                    }
                };

                let router = router.clone();
                let state = state.clone();
                let service = service_fn(move |req| {
                    serve_request(req, router.clone(), state.clone(), request_timeout)
                });

                let conn = http1::Builder::new()
                    .timer(TokioTimer::new())
                    .header_read_timeout(request_timeout)
                    .serve_connection(TokioIo::new(stream), service);
                let conn = graceful.watch(conn);

                tokio::spawn(async move {
                    if let Err(err) = conn.await {
                        warn!("Error serving connection from {}: {:?}", peer, err);
                    }
                });
            }
            _ = &mut shutdown => {
                drop(listener);
                info!("Shutdown signal received, draining connections");
                break;
            }
        }
    }

    let idle_timeout = config.server.idle_timeout();
    tokio::select! {
        _ = graceful.shutdown() => info!("All connections closed"),
        _ = tokio::time::sleep(idle_timeout) => {
            warn!("Timed out after {:?} waiting for connections to close", idle_timeout);
        }
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
