//! The emergency stop: a generational, process-wide cancellation signal.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// Observer invoked synchronously on the triggering thread.
///
/// Handlers must not block indefinitely — the triggering thread may be an
/// OS input-hook callback with delivery deadlines.
pub type TriggerObserver = Arc<dyn Fn() + Send + Sync>;

/// Process-wide emergency cancellation signal with reset semantics.
///
/// Each generation is a [`CancellationToken`]. [`EmergencyStop::trigger`]
/// cancels the current generation; [`EmergencyStop::reset`] installs a fresh
/// un-cancelled one. An operation that captured an older generation observes
/// it as cancelled forever — old generations are never un-cancelled.
///
/// # Example
///
/// ```
/// use warden_guard::EmergencyStop;
///
/// let stop = EmergencyStop::new();
/// let captured = stop.token();
///
/// stop.trigger();
/// assert!(stop.is_triggered());
/// assert!(captured.is_cancelled());
///
/// stop.reset();
/// assert!(!stop.is_triggered());
/// assert!(!stop.token().is_cancelled());
/// // The old generation stays cancelled.
/// assert!(captured.is_cancelled());
/// ```
pub struct EmergencyStop {
    current: Mutex<CancellationToken>,
    observers: Mutex<Vec<TriggerObserver>>,
    trigger_count: AtomicU64,
}

impl EmergencyStop {
    /// Create an un-triggered emergency stop.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: Mutex::new(CancellationToken::new()),
            observers: Mutex::new(Vec::new()),
            trigger_count: AtomicU64::new(0),
        }
    }

    /// The current signal generation.
    ///
    /// Long-running operations capture this once and observe it
    /// cooperatively; a later [`reset`](Self::reset) does not revive it.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.lock_current().clone()
    }

    /// Whether the current generation is cancelled.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.lock_current().is_cancelled()
    }

    /// How many times [`trigger`](Self::trigger) has been called.
    #[must_use]
    pub fn trigger_count(&self) -> u64 {
        self.trigger_count.load(Ordering::Acquire)
    }

    /// Cancel the current generation and notify observers.
    ///
    /// Idempotent against the cancellation state; the observers fire on
    /// every call. Observers run synchronously on the calling thread, after
    /// every internal lock has been released — a handler can safely call
    /// back into this type.
    pub fn trigger(&self) {
        self.lock_current().cancel();
        self.trigger_count.fetch_add(1, Ordering::AcqRel);
        tracing::warn!("emergency stop triggered");

        let observers: Vec<TriggerObserver> = self
            .observers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();
        for observer in observers {
            observer();
        }
    }

    /// Install a fresh, un-cancelled signal generation.
    ///
    /// Operations holding the previous generation continue to observe it as
    /// cancelled.
    pub fn reset(&self) {
        let mut current = self.lock_current();
        *current = CancellationToken::new();
        drop(current);
        tracing::info!("emergency stop reset");
    }

    /// Register an observer fired on every trigger.
    pub fn on_trigger(&self, observer: TriggerObserver) {
        self.observers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(observer);
    }

    fn lock_current(&self) -> std::sync::MutexGuard<'_, CancellationToken> {
        self.current
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for EmergencyStop {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EmergencyStop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmergencyStop")
            .field("triggered", &self.is_triggered())
            .field("trigger_count", &self.trigger_count())
            .finish_non_exhaustive()
    }
}
