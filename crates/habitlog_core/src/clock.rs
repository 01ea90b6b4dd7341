//! Wall-clock source for "today" and creation timestamps.
//!
//! Day keys come from the local calendar at call time. Tests inject a
//! `FixedClock` so date-dependent behavior is deterministic.

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Time provider for store operations.
pub trait Clock {
    /// Current local calendar day.
    fn today(&self) -> NaiveDate;
    /// Current instant, used for `createdAt`.
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant and one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    pub today: NaiveDate,
    pub now: DateTime<Utc>,
}

impl FixedClock {
    /// Pins both values to `today` at midnight UTC.
    pub fn on(today: NaiveDate) -> Self {
        Self {
            today,
            now: today.and_time(chrono::NaiveTime::MIN).and_utc(),
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
