//! Reconnect backoff policy

use rand::Rng;
use std::time::Duration;

/// How long the feed waits before reconnecting after a close or failed connect
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectPolicy {
    /// Delay after the first close / failure
    pub initial_delay: Duration,
    /// Growth factor per consecutive failure
    pub multiplier: f64,
    /// Upper bound for the base delay
    pub max_delay: Duration,
    /// Random spread applied to every delay, as a ratio (0.2 = ±20%)
    pub jitter: f64,
    /// Stop after this many consecutive failed connects (0 = never stop)
    pub max_consecutive_failures: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(3), // 首次重连 3 秒
            multiplier: 2.0,
            max_delay: Duration::from_secs(60), // 最长 60 秒退避
            jitter: 0.2,
            max_consecutive_failures: 20, // 连续失败 20 次后停止
        }
    }
}

impl ReconnectPolicy {
    /// Constant delay, no jitter, retries forever
    pub fn fixed(delay: Duration) -> Self {
        Self {
            initial_delay: delay,
            multiplier: 1.0,
            max_delay: delay,
            jitter: 0.0,
            max_consecutive_failures: 0,
        }
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_jitter(mut self, ratio: f64) -> Self {
        self.jitter = ratio.clamp(0.0, 1.0);
        self
    }

    pub fn with_max_consecutive_failures(mut self, failures: u32) -> Self {
        self.max_consecutive_failures = failures;
        self
    }

    /// Delay before jitter for the given backoff step (0-based)
    pub fn base_delay(&self, step: u32) -> Duration {
        let max = self.max_delay.max(self.initial_delay);
        let factor = self.multiplier.max(1.0).powi(step.min(64) as i32);
        let secs = self.initial_delay.as_secs_f64() * factor;
        if !secs.is_finite() || secs >= max.as_secs_f64() {
            max
        } else {
            Duration::from_secs_f64(secs)
        }
    }

    /// Delay to wait after `failures` consecutive failed connects.
    ///
    /// A close after a successful session counts as zero failures and waits
    /// the initial delay, same as the first failed connect.
    pub fn delay_for(&self, failures: u32) -> Duration {
        let base = self.base_delay(failures.saturating_sub(1));
        if self.jitter <= 0.0 {
            return base;
        }
        let spread = rand::thread_rng().gen_range(-self.jitter..=self.jitter);
        base.mul_f64((1.0 + spread).max(0.0))
    }

    /// Whether the failure ceiling has been reached
    pub fn exhausted(&self, failures: u32) -> bool {
        self.max_consecutive_failures > 0 && failures >= self.max_consecutive_failures
    }
}
