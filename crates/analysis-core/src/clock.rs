use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};

/// Source of "now" for everything that ages or dates data.
///
/// Cache expiry and the historical date range both read time through this
/// trait so tests can pin and advance it.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_advances_only_when_told() {
        let start = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::seconds(61));
        assert_eq!(clock.now(), start + Duration::seconds(61));

        // Clones share the same timeline
        let other = clock.clone();
        other.advance(Duration::seconds(1));
        assert_eq!(clock.now(), start + Duration::seconds(62));
    }
}
