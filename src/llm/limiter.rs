use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};

/// Fixed-interval scheduling policy for backend calls.
///
/// `acquire` resolves once at least the configured interval has elapsed
/// since the previous `acquire`, so consecutive generation requests are
/// spaced apart regardless of where in the pipeline they originate.
#[derive(Debug)]
pub struct FixedIntervalLimiter {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl FixedIntervalLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// Wait until the next call is allowed, then claim its slot
    pub async fn acquire(&self) {
        let mut last_call = self.last_call.lock().await;

        if let Some(last) = *last_call {
            let ready_at = last + self.min_interval;
            if ready_at > Instant::now() {
                sleep_until(ready_at).await;
            }
        }

        *last_call = Some(Instant::now());
    }
}
