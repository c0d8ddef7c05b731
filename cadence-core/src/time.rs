//! Calendar helpers: replay sequences, ISO week and month boundaries,
//! retention horizons.

use chrono::{Datelike, Duration, NaiveDate};

/// Ordered list of whole days from `from` up to `until`, inclusive on both
/// ends. Empty when nothing has elapsed. Replay is driven entirely by this
/// list so it stays deterministic under test.
pub fn date_sequence(from: NaiveDate, until: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut day = from;
    while day <= until {
        dates.push(day);
        day += Duration::days(1);
    }
    dates
}

/// ISO (week, year) of a date. Week 1 contains the year's first Thursday;
/// the ISO year can differ from the calendar year at the edges.
pub fn iso_week(date: NaiveDate) -> (u32, i32) {
    let iw = date.iso_week();
    (iw.week(), iw.year())
}

/// A week boundary is a day whose ISO week differs from the next day's.
pub fn is_last_day_of_iso_week(date: NaiveDate) -> bool {
    iso_week(date) != iso_week(date + Duration::days(1))
}

pub fn is_last_day_of_month(date: NaiveDate) -> bool {
    date.month() != (date + Duration::days(1)).month()
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    let (y, m) = (date.year(), date.month());
    let first = NaiveDate::from_ymd_opt(y, m, 1).unwrap_or(date);
    let next = if m == 12 {
        NaiveDate::from_ymd_opt(y + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(y, m + 1, 1)
    }
    .unwrap_or(first);
    (next - first).num_days() as u32
}

/// ISO (week, year) horizon `n` whole weeks before `today`.
pub fn weeks_before(today: NaiveDate, n: u32) -> (u32, i32) {
    iso_week(today - Duration::weeks(n as i64))
}

/// (month, year) horizon `n` whole months before `today`.
pub fn months_before(today: NaiveDate, n: u32) -> (u32, i32) {
    let total = today.year() * 12 + today.month0() as i32 - n as i32;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    (month, year)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sequence_includes_both_endpoints() {
        let days = date_sequence(day(2026, 3, 3), day(2026, 3, 5));
        assert_eq!(days, vec![day(2026, 3, 3), day(2026, 3, 4), day(2026, 3, 5)]);
        assert_eq!(date_sequence(day(2026, 3, 5), day(2026, 3, 5)).len(), 1);
    }

    #[test]
    fn sequence_is_empty_when_caught_up() {
        assert!(date_sequence(day(2026, 3, 6), day(2026, 3, 5)).is_empty());
    }

    #[test]
    fn sunday_ends_the_iso_week() {
        assert!(is_last_day_of_iso_week(day(2026, 3, 8))); // Sunday
        assert!(!is_last_day_of_iso_week(day(2026, 3, 7))); // Saturday
    }

    #[test]
    fn iso_week_year_differs_at_the_edge() {
        // 2026-01-01 falls in ISO week 1 of 2026; 2027-01-01 is week 53 of 2026.
        assert_eq!(iso_week(day(2026, 1, 1)), (1, 2026));
        assert_eq!(iso_week(day(2027, 1, 1)), (53, 2026));
    }

    #[test]
    fn month_boundaries_and_lengths() {
        assert!(is_last_day_of_month(day(2026, 2, 28)));
        assert!(!is_last_day_of_month(day(2024, 2, 28))); // leap year
        assert_eq!(days_in_month(day(2024, 2, 10)), 29);
        assert_eq!(days_in_month(day(2026, 4, 1)), 30);
        assert_eq!(days_in_month(day(2026, 12, 31)), 31);
    }

    #[test]
    fn retention_horizons_cross_year_boundaries() {
        assert_eq!(months_before(day(2026, 2, 15), 3), (11, 2025));
        assert_eq!(months_before(day(2026, 6, 15), 2), (4, 2026));

        let (week, year) = weeks_before(day(2026, 1, 8), 2);
        assert_eq!(year, 2025);
        assert_eq!(week, 52);
    }
}
