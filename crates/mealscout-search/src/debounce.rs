//! Query debouncer.
//!
//! Holds back a rapidly changing value until it has been stable for a fixed
//! delay. The debouncer owns no timer: callers push values with the current
//! instant, sleep until [`Debouncer::deadline`], then [`Debouncer::poll`].
//! This keeps it usable from a `select!` loop and trivially testable.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Last-write-wins debouncer.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
    settled: Option<T>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    /// Create a debouncer with nothing settled yet.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            settled: None,
        }
    }

    /// Create a debouncer whose starting value counts as already settled.
    ///
    /// Mirrors a mounted search box: the initial term is searched at once,
    /// not after the delay.
    pub fn with_settled(delay: Duration, value: T) -> Self {
        Self {
            delay,
            pending: None,
            settled: Some(value),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a new input. Any earlier pending value is discarded and the
    /// quiet period restarts from `now`.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            deadline: now + self.delay,
        });
    }

    /// When the pending value becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The last value that was emitted (or the initial settled value).
    pub fn settled(&self) -> Option<&T> {
        self.settled.as_ref()
    }

    /// Emit the pending value if its quiet period has elapsed.
    ///
    /// Returns `None` when nothing is due, or when the due value equals the
    /// one already settled (typing `ab` then deleting back to `a` within the
    /// delay produces no new query).
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some(ref p) if p.deadline <= now => {}
            _ => return None,
        }

        let value = self.pending.take()?.value;
        self.settle(value)
    }

    /// Emit the pending value immediately, regardless of its deadline.
    ///
    /// Used when the input closes so the last keystroke is not lost.
    pub fn flush(&mut self) -> Option<T> {
        let value = self.pending.take()?.value;
        self.settle(value)
    }

    fn settle(&mut self, value: T) -> Option<T> {
        if self.settled.as_ref() == Some(&value) {
            return None;
        }

        self.settled = Some(value.clone());
        Some(value)
    }
}
