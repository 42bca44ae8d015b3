use shared::types::Environment;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Default level for an environment when `RUST_LOG` is not set.
pub fn default_level(env: Environment) -> Level {
    match env {
        Environment::Local | Environment::Dev => Level::DEBUG,
        Environment::Prod => Level::INFO,
    }
}

/// Install the global subscriber: human-readable text locally, JSON lines
/// in dev and prod. `RUST_LOG` overrides the level.
pub fn init_logging(env: Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(env).as_str().to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match env {
        Environment::Local => builder.try_init(),
        Environment::Dev | Environment::Prod => builder.json().try_init(),
    };

    if let Err(e) = installed {
        eprintln!("Logger already installed: {}", e);
    }
}
