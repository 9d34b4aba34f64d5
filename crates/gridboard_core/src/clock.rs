//! Millisecond clocks driving layout timestamps and timers.
//!
//! # Invariants
//! - `now_ms` is Unix epoch milliseconds for `SystemClock`.
//! - `ManualClock` clones share one instant; time only moves when a test
//!   moves it.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Source of the current time in Unix epoch milliseconds.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, duration_to_ms)
    }
}

/// Hand-driven clock for deterministic timer tests.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Rc<Cell<i64>>,
}

impl ManualClock {
    pub fn starting_at(now_ms: i64) -> Self {
        Self {
            now_ms: Rc::new(Cell::new(now_ms)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now_ms
            .set(self.now_ms.get().saturating_add(duration_to_ms(by)));
    }

    pub fn set(&self, now_ms: i64) {
        self.now_ms.set(now_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.get()
    }
}

/// Saturating conversion used for deadlines.
pub(crate) fn duration_to_ms(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::{Clock, ManualClock, SystemClock};
    use std::time::Duration;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::starting_at(1_000);
        let observer = clock.clone();
        clock.advance(Duration::from_millis(250));
        assert_eq!(observer.now_ms(), 1_250);
    }

    #[test]
    fn manual_clock_saturates_on_huge_advance() {
        let clock = ManualClock::starting_at(i64::MAX - 10);
        clock.advance(Duration::from_millis(500));
        assert_eq!(clock.now_ms(), i64::MAX);
        clock.advance(Duration::MAX);
        assert_eq!(clock.now_ms(), i64::MAX);
    }

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }
}
