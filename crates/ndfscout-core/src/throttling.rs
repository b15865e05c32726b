use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Fixed-interval request pacer consulted before every gateway call.
///
/// Allows one call per interval with a burst of one: the first call goes
/// through immediately and each later call waits until the interval since
/// the previous one has elapsed. Not adaptive.
#[derive(Clone)]
pub struct RequestPacer {
    limiter: Option<Arc<DirectRateLimiter>>,
    interval: Duration,
}

impl RequestPacer {
    pub fn fixed_interval(interval: Duration) -> Self {
        let limiter =
            Quota::with_period(interval).map(|quota| Arc::new(RateLimiter::direct(quota)));
        Self { limiter, interval }
    }

    /// Pacer that never waits.
    pub fn unlimited() -> Self {
        Self {
            limiter: None,
            interval: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_unlimited(&self) -> bool {
        self.limiter.is_none()
    }

    /// Suspends until the next call is allowed.
    pub async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

impl std::fmt::Debug for RequestPacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestPacer")
            .field("interval", &self.interval)
            .field("unlimited", &self.is_unlimited())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_call_passes_without_waiting() {
        let pacer = RequestPacer::fixed_interval(Duration::from_secs(60));
        let started = std::time::Instant::now();

        pacer.wait().await;

        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(pacer.interval(), Duration::from_secs(60));
    }

    #[tokio::test]
    async fn zero_interval_is_unlimited() {
        let pacer = RequestPacer::fixed_interval(Duration::ZERO);
        let started = std::time::Instant::now();

        assert!(pacer.is_unlimited());
        for _ in 0..5 {
            pacer.wait().await;
        }
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn wait_spaces_consecutive_calls() {
        let pacer = RequestPacer::fixed_interval(Duration::from_millis(40));
        let started = std::time::Instant::now();

        pacer.wait().await;
        pacer.wait().await;
        pacer.wait().await;

        assert!(started.elapsed() >= Duration::from_millis(75));
    }
}
