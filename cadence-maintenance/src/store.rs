//! Collaborator contracts the coordinator drives, plus the persisted row
//! types. Real backends (sql, files) implement these traits; tests and the
//! CLI use the in-memory store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cadence_core::{DayRowView, PeriodStatistics, Task};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store backend failure: {0}")]
    Backend(String),
    #[error("unknown user {0}")]
    UnknownUser(u64),
}

/// The slice of a user the maintenance engine needs: identity plus the
/// statistics watermark. Every day strictly before `statistic_date` has been
/// folded into statistics; the next pass replays `statistic_date` through
/// yesterday and then moves the watermark to its own run date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub statistic_date: NaiveDate,
}

/// One stored day aggregate. Every period gets two rows, one per partition,
/// keyed by (user, date, is_optional).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayStatistic {
    pub user_id: u64,
    pub date: NaiveDate,
    pub is_optional: bool,
    pub points: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekStatistic {
    pub user_id: u64,
    pub week: u32,
    pub year: i32,
    pub is_optional: bool,
    pub points: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthStatistic {
    pub user_id: u64,
    pub month: u32,
    pub year: i32,
    pub is_optional: bool,
    pub points: i64,
    pub percentage: f64,
}

impl DayStatistic {
    /// The mandatory and optional rows for one scored day, in that order.
    pub fn pair(date: NaiveDate, stats: &PeriodStatistics, user_id: u64) -> [DayStatistic; 2] {
        [
            DayStatistic {
                user_id,
                date,
                is_optional: false,
                points: stats.mandatory.points,
                percentage: stats.mandatory.percentage,
            },
            DayStatistic {
                user_id,
                date,
                is_optional: true,
                points: stats.optional.points,
                percentage: stats.optional.percentage,
            },
        ]
    }

    pub fn as_view(&self) -> DayRowView {
        DayRowView {
            is_optional: self.is_optional,
            points: self.points,
            percentage: self.percentage,
        }
    }
}

impl WeekStatistic {
    pub fn pair(week: u32, year: i32, stats: &PeriodStatistics, user_id: u64) -> [WeekStatistic; 2] {
        [
            WeekStatistic {
                user_id,
                week,
                year,
                is_optional: false,
                points: stats.mandatory.points,
                percentage: stats.mandatory.percentage,
            },
            WeekStatistic {
                user_id,
                week,
                year,
                is_optional: true,
                points: stats.optional.points,
                percentage: stats.optional.percentage,
            },
        ]
    }
}

impl MonthStatistic {
    pub fn pair(month: u32, year: i32, stats: &PeriodStatistics, user_id: u64) -> [MonthStatistic; 2] {
        [
            MonthStatistic {
                user_id,
                month,
                year,
                is_optional: false,
                points: stats.mandatory.points,
                percentage: stats.mandatory.percentage,
            },
            MonthStatistic {
                user_id,
                month,
                year,
                is_optional: true,
                points: stats.optional.points,
                percentage: stats.optional.percentage,
            },
        ]
    }
}

pub trait UserStore {
    /// Users whose watermark is strictly before `cutoff`.
    fn find_stale_since(&self, cutoff: NaiveDate) -> Result<Vec<User>, StoreError>;

    /// Advance the watermark. Called once per user, only after every missed
    /// day committed.
    fn mark_statistic_date(&mut self, user_id: u64, date: NaiveDate) -> Result<(), StoreError>;
}

pub trait TaskStore {
    /// Unfinished tasks of the user whose activation falls on `date`.
    fn find_due_on(&self, date: NaiveDate, user_id: u64) -> Result<Vec<Task>, StoreError>;

    fn save(&mut self, task: Task) -> Result<(), StoreError>;
}

pub trait StatisticsStore {
    fn find_day_rows_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        user_id: u64,
    ) -> Result<Vec<DayStatistic>, StoreError>;

    /// Persist both partition rows for a scored day. Writes are de-duplicated
    /// by (user, date, is_optional): the first write for a key wins, so a
    /// crash-retry replay never clobbers rows committed before the crash.
    fn save_day(
        &mut self,
        date: NaiveDate,
        stats: &PeriodStatistics,
        user_id: u64,
    ) -> Result<(), StoreError>;

    fn save_week(
        &mut self,
        week: u32,
        year: i32,
        stats: &PeriodStatistics,
        user_id: u64,
    ) -> Result<(), StoreError>;

    fn save_month(
        &mut self,
        month: u32,
        year: i32,
        stats: &PeriodStatistics,
        user_id: u64,
    ) -> Result<(), StoreError>;

    /// Unconditional deletion of rows strictly older than the horizon.
    fn purge_days_before(&mut self, date: NaiveDate) -> Result<(), StoreError>;
    fn purge_weeks_before(&mut self, week: u32, year: i32) -> Result<(), StoreError>;
    fn purge_months_before(&mut self, month: u32, year: i32) -> Result<(), StoreError>;

    /// Most recent day rows, newest first, capped at `periods * 2` rows.
    fn recent_days(&self, user_id: u64, periods: usize) -> Result<Vec<DayStatistic>, StoreError>;
    fn recent_weeks(&self, user_id: u64, periods: usize) -> Result<Vec<WeekStatistic>, StoreError>;
    fn recent_months(&self, user_id: u64, periods: usize) -> Result<Vec<MonthStatistic>, StoreError>;
}
