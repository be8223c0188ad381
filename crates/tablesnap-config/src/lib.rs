//! tablesnap-config
//!
//! Environment-qualified connection and directory settings.
//! Owns the Config data structure plus the lookup of `config_<env>.json`.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{resolve_environment, ConfigManager, DEFAULT_ENVIRONMENT, ENVIRONMENT_VAR};
pub use model::{Config, OverrideSpec};
