//! Leading-edge throttle over tokio time.

use tokio::time::{Duration, Instant};

/// Rate limiter that lets the first call through and then drops calls
/// arriving within `min_interval` of the last accepted one.
///
/// Uses [`tokio::time::Instant`] so throttled behavior stays deterministic
/// under paused test time.
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    last_accepted: Option<Instant>,
}

impl Throttle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_accepted: None,
        }
    }

    /// Returns `true` when the call should be handled, `false` when it
    /// falls within the throttle window.
    pub fn allow(&mut self) -> bool {
        let now = Instant::now();
        match self.last_accepted {
            Some(last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                self.last_accepted = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_call_passes_then_window_applies() {
        let mut t = Throttle::new(Duration::from_millis(100));
        assert!(t.allow());
        assert!(!t.allow());

        tokio::time::advance(Duration::from_millis(50)).await;
        assert!(!t.allow());

        tokio::time::advance(Duration::from_millis(60)).await;
        assert!(t.allow());
        assert!(!t.allow());
    }
}
