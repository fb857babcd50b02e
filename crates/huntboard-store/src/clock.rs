//! Injected time source so cache TTLs and timestamp stamping are testable
//! without the wall clock.

use chrono::{DateTime, Utc};

/// A source of "now". Stores and the cache take one of these instead of
/// reading the system clock directly.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Hand-advanced clock for tests. Shared handles see the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: std::sync::Arc<std::sync::Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    #[must_use]
    pub fn at(start: DateTime<Utc>) -> Self {
        Self {
            now: std::sync::Arc::new(std::sync::Mutex::new(start)),
        }
    }

    /// Move time forward.
    ///
    /// # Panics
    ///
    /// Panics if another holder poisoned the internal lock.
    pub fn advance(&self, delta: chrono::Duration) {
        let mut now = self.now.lock().expect("clock lock");
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, ManualClock};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn manual_clock_advances_shared_handles() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().expect("instant");
        let clock = ManualClock::at(start);
        let other = clock.clone();

        clock.advance(Duration::seconds(31));
        assert_eq!(other.now(), start + Duration::seconds(31));
    }
}
