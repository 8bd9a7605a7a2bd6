//! Retrying fetch executor

use super::limiter::RateLimiter;
use stackgate_application::FetchError;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default number of retries after upstream throttling
pub const DEFAULT_RETRIES: u32 = 3;

/// Default number of admission checks before giving up on local capacity
pub const DEFAULT_MAX_LOCAL_WAIT_ATTEMPTS: u32 = 10;

/// Default pause between attempts
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(2_000);

/// Budgets for [`RetryingExecutor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after an upstream 429
    pub retries: u32,
    /// Admission checks against the local limiter
    pub max_local_wait_attempts: u32,
    /// Fixed sleep before every retry and every re-check
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            max_local_wait_attempts: DEFAULT_MAX_LOCAL_WAIT_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

/// Runs upstream operations behind the shared rate limiter
///
/// Two budgets are tracked independently: waiting for local admission never
/// consumes upstream retries, and upstream 429 retries never consume local
/// wait attempts.
#[derive(Debug, Clone)]
pub struct RetryingExecutor {
    limiter: Arc<RateLimiter>,
    policy: RetryPolicy,
}

impl RetryingExecutor {
    pub fn new(limiter: Arc<RateLimiter>, policy: RetryPolicy) -> Self {
        Self { limiter, policy }
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Run `operation` with the policy's default budgets
    pub async fn execute<T, F, Fut>(&self, operation: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        self.execute_with(
            self.policy.retries,
            self.policy.max_local_wait_attempts,
            operation,
        )
        .await
    }

    /// Run `operation` with explicit budgets.
    ///
    /// - No local wait attempts left: [`FetchError::RateLimitExhausted`].
    /// - Admission rejected: sleep, spend one local wait attempt, check again.
    /// - Operation throttled (429) with retries left: sleep, spend one retry,
    ///   run again.
    /// - Any other error, or a 429 with no retries left, is returned unchanged.
    pub async fn execute_with<T, F, Fut>(
        &self,
        retries: u32,
        max_local_wait_attempts: u32,
        mut operation: F,
    ) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let mut retries_left = retries;
        let mut waits_left = max_local_wait_attempts;

        loop {
            if waits_left == 0 {
                return Err(FetchError::RateLimitExhausted {
                    attempts: max_local_wait_attempts,
                });
            }

            if !self.limiter.admit() {
                warn!(
                    "Rate limited ({}/{} in window), waiting {:?} ({} checks left)",
                    self.limiter.in_flight(),
                    self.limiter.ceiling(),
                    self.policy.backoff,
                    waits_left - 1
                );
                waits_left -= 1;
                tokio::time::sleep(self.policy.backoff).await;
                continue;
            }

            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_throttled() && retries_left > 0 => {
                    warn!(
                        "Upstream throttled (429), retrying after {:?} ({} retries left)",
                        self.policy.backoff,
                        retries_left - 1
                    );
                    retries_left -= 1;
                    tokio::time::sleep(self.policy.backoff).await;
                }
                Err(e) => {
                    debug!("Upstream call failed: {}", e);
                    return Err(e);
                }
            }
        }
    }
}
