//! Cancellable quiescence timer for search input.

use std::time::{Duration, Instant};

/// Holds the latest armed value until `window` has elapsed with no newer
/// `arm`. Time is passed in by the caller, so any event loop can drive it.
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<Pending<T>>,
}

#[derive(Debug)]
struct Pending<T> {
    deadline: Instant,
    value: T,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Replace any pending value and restart the window from `now`.
    pub fn arm(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            deadline: now + self.window,
            value,
        });
    }

    /// Drop the pending value without delivering it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Deliver the pending value once its deadline has passed.
    pub fn take_ready(&mut self, now: Instant) -> Option<T> {
        let ready = self.pending.as_ref().is_some_and(|p| now >= p.deadline);
        if ready {
            self.cancel()
        } else {
            None
        }
    }
}
