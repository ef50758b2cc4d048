//! Logical-time callback scheduler
//!
//! Holds engine callbacks until their fire time. Time only moves when the
//! session advances it, which makes replays deterministic. There is no
//! cancellation: callbacks re-check their guards when they fire.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::warn;

use crate::phase::Callback;

/// Ordered queue of pending callbacks keyed by `(fire_at, sequence)`.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    next_seq: u64,
    queue: BTreeMap<(Duration, u64), Callback>,
}

impl Scheduler {
    /// Creates a scheduler at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Number of pending callbacks.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Fire time of the earliest pending callback.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(at, _)| *at)
    }

    /// Schedules `callback` to fire `delay_secs` from now.
    ///
    /// Negative or non-finite delays fire immediately. Fire times saturate
    /// at `Duration::MAX`.
    pub fn schedule(&mut self, delay_secs: f64, callback: Callback) {
        let delay = Duration::try_from_secs_f64(delay_secs).unwrap_or_else(|_| {
            warn!(delay_secs, kind = callback.kind(), "invalid delay; firing immediately");
            Duration::ZERO
        });
        let seq = self.next_seq;
        self.next_seq += 1;
        let at = self.now.checked_add(delay).unwrap_or(Duration::MAX);
        self.queue.insert((at, seq), callback);
    }

    /// Removes and returns the earliest callback due at or before `until`,
    /// moving the clock to its fire time.
    pub fn pop_due(&mut self, until: Duration) -> Option<Callback> {
        let entry = self.queue.first_entry()?;
        let (at, _) = *entry.key();
        if at > until {
            return None;
        }
        self.now = self.now.max(at);
        Some(entry.remove())
    }

    /// Moves the clock forward to `until` (never backwards).
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}
