use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

/// Source of wall-clock time for cookie expiry computation.
///
/// Injected into the resolver so that expiry can be asserted exactly in
/// tests. Safe to share across threads.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A manually driven clock for tests and replays.
///
/// Time only moves when [`FixedClock::advance`] or [`FixedClock::set`] is
/// called.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Clock pinned at the UNIX epoch.
    pub fn epoch() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Move the clock forward (or backward, for negative durations).
    pub fn advance(&self, by: Duration) {
        // A plain timestamp has no invariant a panicking writer could break.
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = to;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_is_stable() {
        let clock = FixedClock::epoch();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now(), DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn fixed_clock_advances() {
        let clock = FixedClock::epoch();
        clock.advance(Duration::days(2));
        assert_eq!(clock.now(), DateTime::<Utc>::UNIX_EPOCH + Duration::days(2));
        clock.advance(Duration::hours(-24));
        assert_eq!(clock.now(), DateTime::<Utc>::UNIX_EPOCH + Duration::days(1));
    }

    #[test]
    fn fixed_clock_set() {
        let clock = FixedClock::epoch();
        let target = DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(1_700_000_000);
        clock.set(target);
        assert_eq!(clock.now(), target);
    }

    #[test]
    fn system_clock_is_after_epoch() {
        assert!(SystemClock.now() > DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn clocks_are_object_safe() {
        let clocks: Vec<Box<dyn Clock>> = vec![Box::new(SystemClock), Box::new(FixedClock::epoch())];
        assert!(clocks[1].now() < clocks[0].now());
    }
}
