//! Configuration file loading for stackgate
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `STACKGATE_<SECTION>__<KEY>` environment variables
//! 2. Legacy environment variables (`STACK_EXCHANGE_API_KEY`, ...)
//! 3. `--config <path>` specified file
//! 4. Project root: `./stackgate.toml` or `./.stackgate.toml`
//! 5. XDG config: `$XDG_CONFIG_HOME/stackgate/config.toml`
//! 6. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigError, FileApiConfig, FileConfig, FileLoggingConfig, FileOutputConfig,
    FileRateLimitConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
