//! Wall-clock readings for the weak seed.

use std::cell::Cell;

/// A wall-clock reading split into whole seconds and microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    /// Seconds since the Unix epoch.
    pub secs: i64,
    /// Microseconds within the second.
    pub micros: u32,
}

/// Source of wall-clock time.
pub trait Clock {
    /// Reads the current time.
    fn now(&self) -> Timestamp;
}

/// The system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let now = chrono::Utc::now();
        Timestamp {
            secs: now.timestamp(),
            micros: now.timestamp_subsec_micros(),
        }
    }
}

/// A clock under test control.
///
/// Every read returns the current value and then advances it by one
/// microsecond, so consecutive reads differ the way a real clock would.
#[derive(Debug)]
pub struct ManualClock {
    current: Cell<Timestamp>,
}

impl ManualClock {
    /// Creates a clock whose first reading is `secs.micros`.
    pub fn new(secs: i64, micros: u32) -> Self {
        Self {
            current: Cell::new(Timestamp { secs, micros }),
        }
    }

    /// Jumps the clock to a new reading.
    pub fn set(&self, secs: i64, micros: u32) {
        self.current.set(Timestamp { secs, micros });
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        let ts = self.current.get();
        let next = if ts.micros >= 999_999 {
            Timestamp {
                secs: ts.secs + 1,
                micros: 0,
            }
        } else {
            Timestamp {
                secs: ts.secs,
                micros: ts.micros + 1,
            }
        };
        self.current.set(next);
        ts
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
