//! Single-shot trailing debounce timers.
//!
//! # Responsibility
//! - Collapse bursts of triggers into one action after a quiet period.
//! - Stay host-agnostic: deadlines are compared against caller-supplied
//!   clock readings and serviced by explicit polling.
//!
//! # Invariants
//! - At most one deadline is pending; the latest `schedule` wins.
//! - `take_due` fires a deadline at most once.

use crate::clock::duration_to_ms;
use std::time::Duration;

/// Delay between the last layout mutation and its persisted write.
pub const AUTOSAVE_DELAY: Duration = Duration::from_millis(1_000);

/// Restartable single-shot timer.
#[derive(Debug, Clone)]
pub struct DebounceTimer {
    delay_ms: i64,
    deadline_ms: Option<i64>,
}

impl DebounceTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay_ms: duration_to_ms(delay),
            deadline_ms: None,
        }
    }

    /// Starts (or restarts) the timer relative to `now_ms`.
    pub fn schedule(&mut self, now_ms: i64) {
        self.deadline_ms = Some(now_ms.saturating_add(self.delay_ms));
    }

    /// Drops a pending deadline. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline_ms.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.deadline_ms.is_some()
    }

    pub fn deadline_ms(&self) -> Option<i64> {
        self.deadline_ms
    }

    /// Consumes the deadline when it has elapsed at `now_ms`.
    pub fn take_due(&mut self, now_ms: i64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }
}
