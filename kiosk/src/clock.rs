//! Clock abstraction for deterministic expiry evaluation.
//!
//! Hold expiry is a pure function of wall-clock time and the booking
//! timestamp, so the time source is injected rather than read ambiently.
//! Production code uses [`SystemClock`]; tests use [`ManualClock`] to pin
//! the clock to known instants.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

/// A source of the current time.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
///
/// # Examples
///
/// ```
/// use kiosk::clock::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let now = clock.now();
/// assert!(now.timestamp() > 0);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Intended for tests that need to evaluate expiry at exact offsets from
/// a booking time.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use kiosk::clock::{Clock, ManualClock};
///
/// let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
/// let clock = ManualClock::new(t0);
/// assert_eq!(clock.now(), t0);
///
/// clock.advance(Duration::minutes(5));
/// assert_eq!(clock.now(), t0 + Duration::minutes(5));
/// ```
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a manual clock pinned to the given instant.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Moves the clock forward by the given duration.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned. Acceptable in test code.
    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }

    /// Pins the clock to a new instant.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned. Acceptable in test code.
    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap() = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_system_clock_advances() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn test_manual_clock_is_pinned() {
        let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let clock = ManualClock::new(t0);
        assert_eq!(clock.now(), t0);
        assert_eq!(clock.now(), t0);
    }

    #[test]
    fn test_manual_clock_advance_and_set() {
        let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let clock = ManualClock::new(t0);

        clock.advance(Duration::seconds(301));
        assert_eq!(clock.now(), t0 + Duration::seconds(301));

        clock.set(t0);
        assert_eq!(clock.now(), t0);
    }
}
