//! Fixed-interval spacing of outbound LLM calls.
//!
//! Single-slot model: each call may start no sooner than `interval` after the
//! previous call started. There is no burst allowance.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::trace;

#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last_start: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_start: Mutex::new(None),
        }
    }

    /// A limiter that never waits.
    pub fn unlimited() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for the next slot and claim it.
    ///
    /// The lock is held across the wait, so concurrent callers queue up and
    /// are released one interval apart.
    pub async fn acquire(&self) {
        let mut last_start = self.last_start.lock().await;

        if let Some(previous) = *last_start {
            let ready_at = previous + self.interval;
            if Instant::now() < ready_at {
                trace!(wait_ms = (ready_at - Instant::now()).as_millis() as u64, "Rate limiter waiting");
                tokio::time::sleep_until(ready_at).await;
            }
        }

        *last_start = Some(Instant::now());
    }
}
