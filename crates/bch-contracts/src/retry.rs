//! Retry policy and delay injection for confirmation polling.

use std::time::Duration;

/// How long and how often to poll for a broadcast transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay between consecutive lookup attempts.
    pub interval: Duration,
    /// Total number of lookup attempts before giving up.
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    /// 1200 attempts at 500ms, ten minutes of polling.
    fn default() -> Self {
        RetryPolicy { interval: Duration::from_millis(500), max_attempts: 1200 }
    }
}

/// A sleep primitive, injectable so tests can skip real waiting.
pub trait Delay: Send + Sync {
    /// Wait for the given duration.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}

/// The production delay, backed by the tokio timer.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioDelay;

impl Delay for TokioDelay {
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

/// A delay that returns immediately. For tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopDelay;

impl Delay for NoopDelay {
    fn sleep(&self, _duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        std::future::ready(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Verify the default policy polls every 500ms up to 1200 times.
    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.interval, Duration::from_millis(500));
        assert_eq!(policy.max_attempts, 1200);
    }

    /// Verify the no-op delay resolves without a timer.
    #[tokio::test]
    async fn test_noop_delay() {
        NoopDelay.sleep(Duration::from_secs(3600)).await;
    }
}
