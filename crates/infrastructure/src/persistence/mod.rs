//! Local file persistence.

mod config_repository;

pub use config_repository::{CONFIG_DIR, ConfigError, ConfigRepository, DEFAULT_CONFIG_NAME};
