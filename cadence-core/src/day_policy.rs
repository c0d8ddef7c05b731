//! Allowed-weekday bitmask decoding and next-activation date arithmetic.

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::task::RestrictedDaysPolicy;

/// A non-empty mask always matches within one week of forward scanning.
const FORWARD_SCAN_BOUND: u32 = 7;

/// 7-bit weekday mask. Bit 0 = Monday .. bit 6 = Sunday (ISO numbering,
/// Monday=1..Sunday=7, independent of locale). Higher bits are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedDays(pub u8);

impl AllowedDays {
    pub const ALL: AllowedDays = AllowedDays(0b111_1111);

    /// Build a mask from ISO weekday numbers (1 = Monday .. 7 = Sunday).
    /// Numbers outside 1..=7 are ignored.
    pub fn from_iso_weekdays(days: &[u32]) -> Self {
        let mut mask = 0u8;
        for d in days {
            if (1..=7).contains(d) {
                mask |= 1 << (d - 1);
            }
        }
        AllowedDays(mask)
    }

    /// Whether the given date's weekday is permitted.
    pub fn contains(self, date: NaiveDate) -> bool {
        self.0 & (1 << (date.weekday().number_from_monday() - 1)) != 0
    }

    /// Decode into the set of permitted ISO weekday numbers.
    /// An empty mask is a hard failure, not a default.
    pub fn decode(self) -> Result<BTreeSet<u32>, ScheduleError> {
        let set: BTreeSet<u32> = (0u32..7)
            .filter(|bit| self.0 & (1 << bit) != 0)
            .map(|bit| bit + 1)
            .collect();
        if set.is_empty() {
            return Err(ScheduleError::EmptyAllowedDays);
        }
        Ok(set)
    }
}

/// Compute the next date a recurring task becomes active.
///
/// The candidate is `current + repeat_interval` days. Under `Before` the
/// nearest allowed day at or before the candidate wins, scanning backward and
/// never returning `current` itself. Under `After`, or when the backward scan
/// finds nothing, the search walks forward from the day after the candidate,
/// bounded to one full week.
///
/// The result is always strictly after `current` and always lands on an
/// allowed weekday.
pub fn next_activation_date(
    current: NaiveDate,
    repeat_interval: u32,
    allowed: AllowedDays,
    policy: RestrictedDaysPolicy,
) -> Result<NaiveDate, ScheduleError> {
    // Reject an empty mask up front so the scans below cannot run open-ended.
    allowed.decode()?;

    let candidate = current + Duration::days(repeat_interval.max(1) as i64);

    if policy == RestrictedDaysPolicy::Before {
        let mut day = candidate;
        while day > current {
            if allowed.contains(day) {
                return Ok(day);
            }
            day -= Duration::days(1);
        }
    }

    let mut day = candidate;
    for _ in 0..FORWARD_SCAN_BOUND {
        day += Duration::days(1);
        if allowed.contains(day) {
            return Ok(day);
        }
    }
    // Unreachable with a non-empty mask; bail out rather than loop further.
    Err(ScheduleError::ScanBoundExceeded)
}
