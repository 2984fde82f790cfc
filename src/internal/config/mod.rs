#[path = "_config.rs"]
pub mod config;

pub use self::config::{get_version_info, LoggingConfig, ENV_PREFIX, VERSION};
