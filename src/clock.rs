// This project was developed with assistance from GitHub Copilot
// Time source used by key expiry checks and token issuance

use chrono::{DateTime, Duration, Utc};
use std::sync::RwLock;

/// Source of "now" for every expiry decision in the server.
///
/// Handlers read the clock once per request and pass the instant down, so
/// the discovery filter and the issued claims always agree on the time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock (UTC).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests that need exact boundary instants.
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Jump to an absolute instant
    pub fn set(&self, now: DateTime<Utc>) {
        let mut guard = self.now.write().unwrap_or_else(|e| e.into_inner());
        *guard = now;
    }

    /// Move forward (or backward, for negative durations)
    pub fn advance(&self, by: Duration) {
        let mut guard = self.now.write().unwrap_or_else(|e| e.into_inner());
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_set_and_advance() {
        let t0 = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let clock = FixedClock::new(t0);
        assert_eq!(clock.now(), t0);

        clock.advance(Duration::minutes(90));
        assert_eq!(clock.now(), t0 + Duration::minutes(90));

        clock.set(t0 - Duration::hours(1));
        assert_eq!(clock.now(), t0 - Duration::hours(1));
    }

    #[test]
    fn test_system_clock_is_close_to_utc_now() {
        let before = Utc::now();
        let now = SystemClock.now();
        let after = Utc::now();
        assert!(before <= now && now <= after);
    }
}
