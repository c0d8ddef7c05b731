//! Clock seam so maintenance runs are deterministic under test.

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

pub trait Clock {
    /// The current calendar day in the reference timezone. Replay ranges and
    /// retention horizons are derived from this single value.
    fn today(&self) -> NaiveDate;
}

/// Wall clock projected into a configured IANA timezone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    timezone: Tz,
}

impl SystemClock {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }
}

/// Pinned clock for tests and dry runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_is_pinned() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(FixedClock(date).today(), date);
    }
}
