//! Local request throttling.
//!
//! [`RateLimiter`] is the process-wide sliding-window budget shared by every
//! client; [`RetryingExecutor`] wraps single upstream calls with admission
//! waits and bounded retries of upstream throttling.

mod executor;
mod limiter;

pub use executor::{
    DEFAULT_BACKOFF, DEFAULT_MAX_LOCAL_WAIT_ATTEMPTS, DEFAULT_RETRIES, RetryPolicy,
    RetryingExecutor,
};
pub use limiter::{DEFAULT_CEILING, DEFAULT_WINDOW, RateLimiter};
