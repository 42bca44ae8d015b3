pub mod config;

pub use self::config::{load_config, parse_config, resolve_config_path};
