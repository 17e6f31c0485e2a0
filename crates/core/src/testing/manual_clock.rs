//! Controllable clock for testing.

use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::clock::Clock;

/// Clock that only moves when told to.
///
/// # Example
///
/// ```rust,ignore
/// use fila_core::testing::ManualClock;
///
/// let clock = Arc::new(ManualClock::default());
/// let mut store = QueueStore::new(config).with_clock(clock.clone());
///
/// let ticket = store.register(patient, PriorityClass::Normal);
/// clock.advance_minutes(5);
/// let called = store.call_next()?.unwrap();
/// assert_eq!(called.wait_minutes(), Some(5.0));
/// ```
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }

    /// Move the clock forward by whole minutes.
    pub fn advance_minutes(&self, minutes: i64) {
        self.advance(Duration::minutes(minutes));
    }

    /// Jump to a specific instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().unwrap() = instant;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
