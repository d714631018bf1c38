//! Fixed delay in front of remote fetches.
//!
//! The spreadsheet API enforces a per-minute read quota per user. Every fetch
//! that misses the cache waits `delay` first, which keeps a burst of page
//! loads under that quota.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use log::debug;

#[derive(Debug)]
pub struct FetchPacer {
    delay: Duration,
    waits: AtomicU64,
}

impl FetchPacer {
    /// A zero `delay` disables pacing.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            waits: AtomicU64::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Sleeps for the configured delay before a fetch.
    pub async fn wait(&self, label: &str) {
        if self.delay.is_zero() {
            return;
        }
        self.waits.fetch_add(1, Ordering::Relaxed);
        debug!("Pacing fetch of '{}' by {:?}", label, self.delay);
        tokio::time::sleep(self.delay).await;
    }

    /// Number of paced fetches so far.
    pub fn waits(&self) -> u64 {
        self.waits.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_waits_for_configured_delay() {
        let pacer = FetchPacer::new(Duration::from_millis(30));
        let started = Instant::now();
        pacer.wait("expenses").await;

        assert!(started.elapsed() >= Duration::from_millis(30));
        assert_eq!(pacer.waits(), 1);
    }

    #[tokio::test]
    async fn test_zero_delay_is_disabled() {
        let pacer = FetchPacer::new(Duration::ZERO);
        pacer.wait("expenses").await;
        assert_eq!(pacer.waits(), 0);
    }
}
