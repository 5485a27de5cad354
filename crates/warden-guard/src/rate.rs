//! Sliding one-second window rate limiter.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// The sliding window length.
const WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug, Default)]
struct RateInner {
    /// Monotonically time-ordered timestamps of recent actions.
    window: VecDeque<Instant>,
    /// Maximum actions per second; 0 disables limiting.
    max_per_second: usize,
}

/// Advisory sliding-window rate limiter.
///
/// The limiter only *reports* violations; whether to enforce them is the
/// caller's decision (the dispatcher rejects, see `warden-dispatch`).
///
/// # Example
///
/// ```
/// use warden_guard::RateLimiter;
///
/// let limiter = RateLimiter::new();
/// limiter.set_limit(2);
/// assert!(!limiter.record_and_check());
/// assert!(!limiter.record_and_check());
/// assert!(limiter.record_and_check()); // third within one second
/// ```
#[derive(Debug, Default)]
pub struct RateLimiter {
    inner: Mutex<RateInner>,
}

impl RateLimiter {
    /// Create a disabled limiter (limit 0).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a limiter with an initial ceiling.
    #[must_use]
    pub fn with_limit(max_per_second: usize) -> Self {
        let limiter = Self::new();
        limiter.set_limit(max_per_second);
        limiter
    }

    /// Replace the ceiling and clear history. `0` disables limiting.
    pub fn set_limit(&self, max_per_second: usize) {
        let mut inner = self.lock();
        inner.max_per_second = max_per_second;
        inner.window.clear();
    }

    /// The configured ceiling (0 = disabled).
    #[must_use]
    pub fn limit(&self) -> usize {
        self.lock().max_per_second
    }

    /// Record the current action and report whether the window now exceeds
    /// the ceiling.
    ///
    /// When disabled, returns `false` without recording.
    #[must_use]
    pub fn record_and_check(&self) -> bool {
        let mut inner = self.lock();
        if inner.max_per_second == 0 {
            return false;
        }
        let now = Instant::now();
        inner.window.push_back(now);
        Self::prune(&mut inner.window, now);
        inner.window.len() > inner.max_per_second
    }

    /// Snapshot of the pruned window size.
    #[must_use]
    pub fn current_rate(&self) -> usize {
        let mut inner = self.lock();
        let now = Instant::now();
        Self::prune(&mut inner.window, now);
        inner.window.len()
    }

    fn prune(window: &mut VecDeque<Instant>, now: Instant) {
        while let Some(oldest) = window.front() {
            if now.duration_since(*oldest) > WINDOW {
                window.pop_front();
            } else {
                break;
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RateInner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
