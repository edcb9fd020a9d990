//! Loads and validates `.typegen.yml` style configuration.

mod config;
mod error;
mod loader;

pub use config::{
    AuthConfig, CacheConfig, OperationConfig, PackageConfig, TypeConfig, TypegenConfig,
    DEFAULT_API_KEY_ENV_VAR, DEFAULT_AUTH_HEADER, DEFAULT_SCHEMA_FILE,
};
pub use error::{ConfigError, Result};
pub use loader::{find_config, load_config, load_config_from_str};
