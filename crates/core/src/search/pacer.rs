//! Minimum spacing between consecutive remote calls.

use tokio::sync::Mutex;
use tokio::time::{sleep, Duration, Instant};
use tracing::trace;

/// Enforces a fixed minimum interval between calls.
///
/// Unlike a token bucket there is no burst allowance: every call after the
/// first waits until `min_interval` has passed since the previous one. The
/// lock is held while sleeping, so concurrent callers queue up in order.
#[derive(Debug)]
pub struct RequestPacer {
    min_interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl RequestPacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until the next call is allowed, then record it.
    pub async fn wait(&self) {
        let mut last = self.last.lock().await;

        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                let remaining = self.min_interval - elapsed;
                trace!("Pacing remote call, waiting {}ms", remaining.as_millis());
                sleep(remaining).await;
            }
        }

        *last = Some(Instant::now());
    }
}
