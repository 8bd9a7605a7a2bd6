//! Infrastructure layer for stackgate
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the throttled Stack Exchange client and
//! configuration file loading.

pub mod config;
pub mod stack_exchange;
pub mod throttle;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, FileConfig};
pub use stack_exchange::{ClientSettings, StackExchangeClient};
pub use throttle::{RateLimiter, RetryPolicy, RetryingExecutor};
