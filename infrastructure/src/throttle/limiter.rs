//! Sliding-window rate limiter

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// Default number of admitted requests per window
pub const DEFAULT_CEILING: usize = 30;

/// Default window length
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(60_000);

/// Sliding-window admission control over recent request timestamps
///
/// One instance is shared (via `Arc`) by every client in the process so that
/// all concurrent invocations draw from the same budget. Eviction and
/// recording happen under one lock, so two callers can never both take the
/// last free slot.
#[derive(Debug)]
pub struct RateLimiter {
    ceiling: usize,
    window: Duration,
    admitted: Mutex<VecDeque<Instant>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_CEILING, DEFAULT_WINDOW)
    }
}

impl RateLimiter {
    pub fn new(ceiling: usize, window: Duration) -> Self {
        Self {
            ceiling,
            window,
            admitted: Mutex::new(VecDeque::new()),
        }
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Try to admit one request now.
    ///
    /// Evicts timestamps that have left the window, then records the current
    /// time and returns `true` if the remaining count is below the ceiling.
    /// A rejected call records nothing.
    pub fn admit(&self) -> bool {
        let now = Instant::now();
        let mut admitted = self.lock();
        Self::evict(&mut admitted, now, self.window);

        if admitted.len() >= self.ceiling {
            return false;
        }
        admitted.push_back(now);
        true
    }

    /// Number of admissions still inside the window
    pub fn in_flight(&self) -> usize {
        let mut admitted = self.lock();
        Self::evict(&mut admitted, Instant::now(), self.window);
        admitted.len()
    }

    fn evict(admitted: &mut VecDeque<Instant>, now: Instant, window: Duration) {
        while let Some(oldest) = admitted.front() {
            if now.duration_since(*oldest) < window {
                break;
            }
            admitted.pop_front();
        }
    }

    // The guarded state is a plain queue; a panic elsewhere cannot leave it
    // half-updated, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, VecDeque<Instant>> {
        self.admitted.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_admits_up_to_ceiling_then_rejects() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));

        for _ in 0..3 {
            assert!(limiter.admit());
        }
        assert!(!limiter.admit());
        assert_eq!(limiter.in_flight(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejection_is_not_recorded() {
        let limiter = RateLimiter::new(1, Duration::from_secs(10));
        assert!(limiter.admit());

        for _ in 0..5 {
            assert!(!limiter.admit());
        }
        assert_eq!(limiter.in_flight(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_expiry_readmits() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        assert!(limiter.admit());
        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(limiter.admit());
        assert!(!limiter.admit());

        // Oldest entry leaves the window, the newer one stays
        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(limiter.admit());
        assert!(!limiter.admit());
        assert_eq!(limiter.in_flight(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_ceiling_never_admits() {
        let limiter = RateLimiter::new(0, Duration::from_secs(1));
        assert!(!limiter.admit());
        assert_eq!(limiter.in_flight(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_admission_never_exceeds_ceiling() {
        let limiter = Arc::new(RateLimiter::new(25, Duration::from_secs(60)));

        let handles: Vec<_> = (0..100)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move { limiter.admit() })
            })
            .collect();

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 25);
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_ceiling_is_not_preallocated() {
        let limiter = RateLimiter::new(usize::MAX, Duration::from_secs(60));
        assert!(limiter.admit());
        assert_eq!(limiter.in_flight(), 1);
    }

    #[test]
    fn test_defaults() {
        let limiter = RateLimiter::default();
        assert_eq!(limiter.ceiling(), 30);
        assert_eq!(limiter.window(), Duration::from_millis(60_000));
    }
}
