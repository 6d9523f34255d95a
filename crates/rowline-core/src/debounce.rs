//! Debouncing for rapid successive inputs.
//!
//! A [`Debouncer`] holds the most recent submitted value until a quiet
//! window has elapsed without a newer submission, then releases it exactly
//! once. Released values are compared against the previously released one;
//! an unchanged value is swallowed.
//!
//! Time is passed in explicitly (`*_at` methods) so callers driving their
//! own clock, and tests, stay deterministic. The plain variants use
//! [`Instant::now`].

use std::time::{Duration, Instant};

use crate::logging::targets;

/// Coalesces rapid submissions into at most one release per quiet window.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<Pending<T>>,
    last_released: Option<T>,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    ready_at: Instant,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    /// Create a debouncer with the given quiet window.
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            last_released: None,
        }
    }

    /// Create a debouncer that treats `initial` as already released.
    pub fn with_initial(quiet: Duration, initial: T) -> Self {
        Self {
            quiet,
            pending: None,
            last_released: Some(initial),
        }
    }

    /// The quiet window.
    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Submit a value now.
    pub fn submit(&mut self, value: T) {
        self.submit_at(value, Instant::now());
    }

    /// Submit a value at `now`; restarts the quiet window.
    pub fn submit_at(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            ready_at: now + self.quiet,
        });
    }

    /// Check whether a value is waiting for its quiet window.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left until the pending value is released, if any.
    pub fn time_until_ready(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|p| p.ready_at.saturating_duration_since(now))
    }

    /// Release the pending value if its quiet window has elapsed.
    pub fn poll(&mut self) -> Option<T> {
        self.poll_at(Instant::now())
    }

    /// Release the pending value if its quiet window has elapsed by `now`.
    ///
    /// Returns `None` while the window is still open, when nothing is
    /// pending, or when the value equals the last released one.
    pub fn poll_at(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(p) if p.ready_at <= now => {}
            _ => return None,
        }
        self.flush()
    }

    /// Release the pending value immediately, ignoring the quiet window.
    pub fn flush(&mut self) -> Option<T> {
        let pending = self.pending.take()?;
        if self.last_released.as_ref() == Some(&pending.value) {
            tracing::trace!(target: targets::DEBOUNCE, "debounced value unchanged, swallowing");
            return None;
        }
        self.last_released = Some(pending.value.clone());
        Some(pending.value)
    }

    /// Drop the pending value without releasing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Record `value` as released without going through the window.
    ///
    /// Used when a value is applied through another path so that a later
    /// identical submission is recognized as unchanged.
    pub fn mark_released(&mut self, value: T) {
        self.last_released = Some(value);
    }

    /// The last value released.
    pub fn last_released(&self) -> Option<&T> {
        self.last_released.as_ref()
    }
}
