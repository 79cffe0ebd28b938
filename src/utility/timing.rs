// ============================================
// TIMING UTILITY - Performance Measurement
// ============================================
// Usage:
//   1. Scoped: let _timer = Timer::start("name"); ... (logged on drop)
//   2. Manual: let timer = Timer::start("name"); ... timer.stop();
//   3. Async wrapper: timed_async("name", || async { ... }).await;
// ============================================

use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Above this a timing is reported as a warning
pub const SLOW_THRESHOLD_MS: u128 = 5_000;

/// Timer for measuring execution time
pub struct Timer {
    name: String,
    start: Instant,
    threshold_ms: u128,
    silent: bool,
}

impl Timer {
    /// Create a new timer with a name
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
            threshold_ms: 0,
            silent: false,
        }
    }

    /// Create a timer that only logs if execution exceeds threshold (in milliseconds)
    pub fn start_with_threshold(name: impl Into<String>, threshold_ms: u128) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
            threshold_ms,
            silent: false,
        }
    }

    /// Create a silent timer (won't auto-log on drop, use elapsed() manually)
    pub fn silent(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
            threshold_ms: 0,
            silent: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }

    /// Stop the timer and log the result
    pub fn stop(mut self) -> Duration {
        let duration = self.start.elapsed();
        self.log_duration(duration);
        self.silent = true;
        duration
    }

    fn log_duration(&self, duration: Duration) {
        if self.silent {
            return;
        }

        let ms = duration.as_millis();
        if ms < self.threshold_ms {
            return;
        }

        match ms {
            0..=1_000 => debug!(operation = %self.name, elapsed_ms = ms as u64, "timing"),
            1_001..SLOW_THRESHOLD_MS => {
                info!(operation = %self.name, elapsed_ms = ms as u64, "timing")
            }
            _ => warn!(operation = %self.name, elapsed_ms = ms as u64, "slow operation"),
        }
    }
}

// Auto-log on drop if not silent
impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        self.log_duration(duration);
    }
}

/// Time an async function (shorthand)
pub async fn timed_async<F, Fut, R>(name: impl Into<String>, f: F) -> R
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = R>,
{
    let timer = Timer::start(name);
    let result = f().await;
    timer.stop();
    result
}
